use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::io::store::{StoreError, TaskStore};
use crate::model::query::{SortMode, SortOrder, TaskQuery};
use crate::model::task::{Priority, Task};

/// In-process task store with the same observable behavior as the REST
/// store: integer ids, step ids reassigned on every write, store-side
/// sorting and filtering.
#[derive(Default)]
pub struct MemoryTaskStore {
    state: Mutex<MemoryState>,
    fail_writes: AtomicBool,
}

#[derive(Default)]
struct MemoryState {
    next_task_id: i64,
    next_step_id: i64,
    tasks: Vec<Task>,
}

impl MemoryState {
    /// Store a copy of `task` under `id`, with fresh step ids and positional order.
    fn stored_copy(&mut self, task: &Task, id: i64) -> Task {
        let mut stored = task.clone();
        stored.id = Some(id);
        for (i, step) in stored.steps.iter_mut().enumerate() {
            self.next_step_id += 1;
            step.id = Some(self.next_step_id.to_string());
            step.order = (i + 1) as u32;
        }
        stored
    }
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a 500, to exercise failure paths.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected {
                status: 500,
                message: "write failed".to_string(),
            });
        }
        Ok(())
    }
}

fn priority_rank(p: Priority) -> u8 {
    match p {
        Priority::High => 1,
        Priority::Medium => 2,
        Priority::Low => 3,
    }
}

/// Store-side ordering. "Ascending" priority lists low before high.
fn sort_tasks(tasks: &mut [Task], query: &TaskQuery) {
    match (query.sort, query.order) {
        (SortMode::DueDate, SortOrder::Asc) => tasks.sort_by_key(|t| t.due_date),
        (SortMode::DueDate, SortOrder::Desc) => {
            tasks.sort_by(|a, b| b.due_date.cmp(&a.due_date))
        }
        (SortMode::Priority, SortOrder::Asc) => {
            tasks.sort_by(|a, b| priority_rank(b.priority).cmp(&priority_rank(a.priority)))
        }
        (SortMode::Priority, SortOrder::Desc) => {
            tasks.sort_by_key(|t| priority_rank(t.priority))
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let state = self.lock();
        let mut tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|t| query.completed.is_none_or(|c| t.completed == c))
            .cloned()
            .collect();
        sort_tasks(&mut tasks, query);
        Ok(tasks)
    }

    async fn get_task(&self, id: i64) -> Result<Task, StoreError> {
        self.lock()
            .tasks
            .iter()
            .find(|t| t.id == Some(id))
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create_task(&self, task: &Task) -> Result<Task, StoreError> {
        self.check_writable()?;
        let mut state = self.lock();
        state.next_task_id += 1;
        let id = state.next_task_id;
        let stored = state.stored_copy(task, id);
        state.tasks.push(stored.clone());
        Ok(stored)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, StoreError> {
        let id = task.id.ok_or(StoreError::MissingId)?;
        self.check_writable()?;
        let mut state = self.lock();
        let pos = state
            .tasks
            .iter()
            .position(|t| t.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        let stored = state.stored_copy(task, id);
        state.tasks[pos] = stored.clone();
        Ok(stored)
    }

    async fn toggle_task(&self, id: i64) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut state = self.lock();
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        task.completed = !task.completed;
        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut state = self.lock();
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != Some(id));
        if state.tasks.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
