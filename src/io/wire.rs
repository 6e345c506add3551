//! JSON records exchanged with the REST task store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::task::{Priority, Task};
use crate::ops::validate::steps_from_raw;

/// A task as the store returns it. Steps stay raw until validated.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub steps: Option<Value>,
}

impl TaskRecord {
    pub fn into_task(self) -> Task {
        let steps = match &self.steps {
            None | Some(Value::Null) => Vec::new(),
            Some(raw) => steps_from_raw(raw),
        };
        Task {
            id: Some(self.id),
            title: self.title,
            description: self.description.filter(|d| !d.is_empty()),
            due_date: self.due_date,
            priority: self.priority,
            completed: self.completed,
            steps,
        }
    }
}

/// Body of a create/update request.
#[derive(Debug, Serialize)]
pub struct TaskPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub completed: bool,
    pub steps: Vec<StepPayload<'a>>,
}

/// Steps go out without ids: the store assigns its own.
#[derive(Debug, Serialize)]
pub struct StepPayload<'a> {
    pub title: &'a str,
    pub order: u32,
    pub completed: bool,
}

impl<'a> From<&'a Task> for TaskPayload<'a> {
    fn from(task: &'a Task) -> Self {
        TaskPayload {
            id: task.id,
            title: &task.title,
            description: task.description.as_deref(),
            due_date: task.due_date,
            priority: task.priority,
            completed: task.completed,
            steps: task
                .steps
                .iter()
                .enumerate()
                .map(|(i, s)| StepPayload {
                    title: &s.title,
                    order: (i + 1) as u32,
                    completed: s.completed,
                })
                .collect(),
        }
    }
}

/// `{"error": "..."}` body on failed requests
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Decode a list response; `null` is an empty list.
pub fn decode_task_list(body: &str) -> Result<Vec<Task>, serde_json::Error> {
    let records: Option<Vec<TaskRecord>> = serde_json::from_str(body)?;
    Ok(records
        .unwrap_or_default()
        .into_iter()
        .map(TaskRecord::into_task)
        .collect())
}

pub fn decode_task(body: &str) -> Result<Task, serde_json::Error> {
    let record: TaskRecord = serde_json::from_str(body)?;
    Ok(record.into_task())
}

/// Best-effort message from an error response body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => err.error,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
