use chrono::{Local, NaiveDate};

use crate::io::store::{StoreError, TaskStore};
use crate::model::task::{Priority, Task};
use crate::ops::completion::resolve_completion;
use crate::ops::drag::{DragEnd, DragOutcome, handle_drag_end};
use crate::ops::step_ops::{StepError, StepList, StepUpdate};

/// Error type for editing-session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("task title is blank")]
    BlankTitle,
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The task form being created or edited, with its step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// `None` while creating a new task
    pub task_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    /// User-set completion; only consulted when there are no steps
    completed: bool,
    steps: StepList,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// Blank create form, due today.
    pub fn new() -> Self {
        Self::new_on(Local::now().date_naive())
    }

    pub fn new_on(today: NaiveDate) -> Self {
        EditSession {
            task_id: None,
            title: String::new(),
            description: String::new(),
            due_date: today,
            priority: Priority::Low,
            completed: false,
            steps: StepList::new(),
        }
    }

    /// Pre-fill from an existing task. Any steps in the form are discarded.
    pub fn load(task: &Task) -> Self {
        let mut session = Self::new_on(task.due_date);
        session.replace_with(task);
        session
    }

    /// Back to a blank create form.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn replace_with(&mut self, task: &Task) {
        self.task_id = task.id;
        self.title = task.title.clone();
        self.description = task.description.clone().unwrap_or_default();
        self.due_date = task.due_date;
        self.priority = task.priority;
        self.completed = task.completed;
        self.steps.replace_all(task.steps.clone());
    }

    pub fn steps(&self) -> &StepList {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut StepList {
        &mut self.steps
    }

    /// The task's completion as it would be saved, recomputed on every call.
    pub fn completed(&self) -> bool {
        resolve_completion(self.steps.steps(), self.completed)
    }

    /// Set the user completion flag. Has no visible effect while the task
    /// has steps, since completion is then derived from them.
    pub fn set_completed(&mut self, done: bool) {
        self.completed = done;
    }

    pub fn add_step(&mut self, title: &str) -> Result<String, SessionError> {
        Ok(self.steps.add(title)?)
    }

    pub fn remove_step(&mut self, index: usize) -> Result<(), SessionError> {
        self.steps.remove(index)?;
        Ok(())
    }

    pub fn rename_step(&mut self, index: usize, title: impl Into<String>) -> Result<(), SessionError> {
        self.steps.update(index, StepUpdate::Title(title.into()))?;
        Ok(())
    }

    /// Flip one step and return the task's recomputed completion. The user
    /// flag is left alone.
    pub fn toggle_step(&mut self, index: usize) -> Result<bool, SessionError> {
        self.steps.toggle(index)?;
        Ok(self.completed())
    }

    pub fn move_step(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        self.steps.move_step(from, to)?;
        Ok(())
    }

    pub fn drag(&mut self, event: &DragEnd) -> DragOutcome {
        handle_drag_end(&mut self.steps, event)
    }

    /// The record to submit: contiguous step order and derived completion.
    pub fn to_task(&self) -> Result<Task, SessionError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(SessionError::BlankTitle);
        }
        let description = self.description.trim();
        Ok(Task {
            id: self.task_id,
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            due_date: self.due_date,
            priority: self.priority,
            completed: self.completed(),
            steps: self.steps.snapshot(),
        })
    }

    /// Create or update the task in `store`. On success the session takes
    /// the store's copy; on failure the local edits are kept as they are.
    pub async fn save<S>(&mut self, store: &S) -> Result<Task, SessionError>
    where
        S: TaskStore + ?Sized,
    {
        let task = self.to_task()?;
        let result = match task.id {
            Some(_) => store.update_task(&task).await,
            None => store.create_task(&task).await,
        };
        match result {
            Ok(stored) => {
                self.replace_with(&stored);
                Ok(stored)
            }
            Err(err) => {
                tracing::warn!(%err, "save failed, keeping local edits");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory_store::MemoryTaskStore;
    use crate::model::task::Step;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn session_with_steps(titles: &[&str]) -> EditSession {
        let mut s = EditSession::new_on(day(1));
        s.title = "Cook dinner".into();
        for t in titles {
            s.add_step(t).unwrap();
        }
        s
    }

    #[test]
    fn test_new_form_defaults() {
        let s = EditSession::new_on(day(1));
        assert_eq!(s.task_id, None);
        assert_eq!(s.priority, Priority::Low);
        assert_eq!(s.due_date, day(1));
        assert!(s.steps().is_empty());
        assert!(!s.completed());
    }

    #[test]
    fn test_toggle_recomputes_completion() {
        let mut s = session_with_steps(&["Chop", "Fry"]);
        assert!(!s.toggle_step(0).unwrap());
        assert!(s.toggle_step(1).unwrap());
        assert!(!s.toggle_step(0).unwrap());
    }

    #[test]
    fn test_user_flag_only_without_steps() {
        let mut s = session_with_steps(&[]);
        s.set_completed(true);
        assert!(s.completed());
        s.add_step("Chop").unwrap();
        assert!(!s.completed());
    }

    #[test]
    fn test_removing_every_step_restores_user_flag() {
        let mut s = session_with_steps(&["Chop"]);
        assert!(s.toggle_step(0).unwrap());
        s.remove_step(0).unwrap();
        assert!(!s.completed());

        s.set_completed(true);
        s.add_step("Fry").unwrap();
        s.toggle_step(0).unwrap();
        s.toggle_step(0).unwrap();
        s.remove_step(0).unwrap();
        assert!(s.completed());
    }

    #[test]
    fn test_to_task_rejects_blank_title() {
        let mut s = EditSession::new_on(day(1));
        s.title = "   ".into();
        assert!(matches!(s.to_task(), Err(SessionError::BlankTitle)));
    }

    #[test]
    fn test_to_task_trims_and_drops_empty_description() {
        let mut s = session_with_steps(&["Chop"]);
        s.description = "  ".into();
        let task = s.to_task().unwrap();
        assert_eq!(task.description, None);
        assert_eq!(task.steps[0].order, 1);
    }

    #[test]
    fn test_load_discards_previous_steps() {
        let mut task = Task::new("Existing", day(9));
        task.id = Some(4);
        task.steps = vec![Step::new(Some("7".into()), "Only")];
        let s = EditSession::load(&task);
        assert_eq!(s.task_id, Some(4));
        assert_eq!(s.steps().len(), 1);
        assert_eq!(s.steps().get(0).unwrap().order, 1);
    }

    #[test]
    fn test_invalid_index_surfaces_step_error() {
        let mut s = session_with_steps(&["Chop"]);
        assert!(matches!(
            s.remove_step(3),
            Err(SessionError::Step(StepError::IndexOutOfRange { index: 3, len: 1 }))
        ));
    }

    #[tokio::test]
    async fn test_save_creates_then_takes_store_copy() {
        let store = MemoryTaskStore::new();
        let mut s = session_with_steps(&["Chop", "Fry"]);
        let stored = s.save(&store).await.unwrap();
        assert_eq!(stored.id, Some(1));
        assert_eq!(s.task_id, Some(1));
        // store-assigned step ids replace the local ones
        assert_eq!(s.steps().get(0).unwrap().id.as_deref(), Some("1"));

        s.toggle_step(0).unwrap();
        s.save(&store).await.unwrap();
        let fetched = store.get_task(1).await.unwrap();
        assert!(fetched.steps[0].completed);
        assert_eq!(fetched.steps.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_local_edits() {
        let store = MemoryTaskStore::new();
        let mut s = session_with_steps(&["Chop"]);
        s.save(&store).await.unwrap();

        store.fail_writes(true);
        s.add_step("Fry").unwrap();
        let err = s.save(&store).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::Rejected { .. })));
        assert_eq!(s.steps().len(), 2);
        assert_eq!(store.get_task(1).await.unwrap().steps.len(), 1);
    }

    #[test]
    fn test_reset_clears_form() {
        let mut s = session_with_steps(&["Chop"]);
        s.task_id = Some(3);
        s.reset();
        assert_eq!(s.task_id, None);
        assert!(s.title.is_empty());
        assert!(s.steps().is_empty());
    }
}
