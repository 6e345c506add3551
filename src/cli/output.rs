use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::{Priority, Step, Task};
use crate::ops::identity::step_key;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

/// Widest title column in task listings
const MAX_TITLE_CELLS: usize = 40;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: Option<i64>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub completed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepJson>,
}

#[derive(Serialize)]
pub struct StepJson {
    /// Key to pass to `mt step drag`
    pub key: String,
    pub title: String,
    pub order: u32,
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        due_date: task.due_date,
        priority: task.priority,
        completed: task.completed,
        steps: task
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| step_to_json(s, i))
            .collect(),
    }
}

pub fn step_to_json(step: &Step, index: usize) -> StepJson {
    StepJson {
        key: step_key(step, index).into_owned(),
        title: step.title.clone(),
        order: step.order,
        completed: step.completed,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn check_char(done: bool) -> char {
    if done { 'x' } else { ' ' }
}

fn id_label(task: &Task) -> String {
    task.id.map(|id| format!("#{}", id)).unwrap_or_else(|| "#-".to_string())
}

/// "2/3 steps", or empty for a task without steps
fn progress(task: &Task) -> String {
    if task.steps.is_empty() {
        return String::new();
    }
    let done = task.steps.iter().filter(|s| s.completed).count();
    format!("{}/{} steps", done, task.steps.len())
}

/// One line per task with aligned id and title columns.
pub fn format_task_list(tasks: &[Task]) -> Vec<String> {
    let id_width = tasks.iter().map(|t| id_label(t).len()).max().unwrap_or(0);
    let title_width = tasks
        .iter()
        .map(|t| display_width(&t.title).min(MAX_TITLE_CELLS))
        .max()
        .unwrap_or(0);

    tasks
        .iter()
        .map(|task| {
            let title = truncate_to_width(&task.title, MAX_TITLE_CELLS);
            let line = format!(
                "[{}] {}  {}  {}  {:<6}  {}",
                check_char(task.completed),
                pad_to_width(&id_label(task), id_width),
                pad_to_width(&title, title_width),
                task.due_date,
                task.priority.label(),
                progress(task),
            );
            line.trim_end().to_string()
        })
        .collect()
}

/// Detailed task view, steps numbered from 1 with their drag keys.
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![format!(
        "[{}] {} {}",
        check_char(task.completed),
        id_label(task),
        task.title
    )];

    if let Some(desc) = &task.description {
        lines.push(format!("description: {}", desc));
    }
    lines.push(format!("due: {}", task.due_date));
    lines.push(format!("priority: {}", task.priority.label()));
    lines.push(format!(
        "status: {}",
        if task.completed { "Completed" } else { "Incomplete" }
    ));

    if !task.steps.is_empty() {
        lines.push(format!("steps ({}):", progress(task)));
        for (i, step) in task.steps.iter().enumerate() {
            let title = if step.title.is_empty() {
                "(untitled)"
            } else {
                step.title.as_str()
            };
            lines.push(format!(
                "  {}. [{}] {}  <{}>",
                i + 1,
                check_char(step.completed),
                title,
                step_key(step, i)
            ));
        }
    }

    lines
}

/// Parse a due date given on the command line
pub fn parse_due_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid due date '{}' (expected YYYY-MM-DD)", s))
}

/// Parse a priority given on the command line
pub fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s)
        .ok_or_else(|| format!("unknown priority '{}' (expected: low, medium, high)", s))
}

/// Convert a 1-based position from the command line to an index.
pub fn position_to_index(pos: usize) -> Result<usize, String> {
    pos.checked_sub(1)
        .ok_or_else(|| "step positions start at 1".to_string())
}
