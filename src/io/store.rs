use async_trait::async_trait;

use crate::model::query::TaskQuery;
use crate::model::task::Task;

/// Error type for remote store calls
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(i64),
    #[error("task has not been created yet")]
    MissingId,
    #[error("store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("could not reach task store: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response from task store: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The remote task store. Sorting and filtering are the store's job; every
/// task handed back has had its steps through validation.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError>;

    async fn get_task(&self, id: i64) -> Result<Task, StoreError>;

    /// Create `task` (its `id` is ignored) and return the stored copy.
    async fn create_task(&self, task: &Task) -> Result<Task, StoreError>;

    /// Replace the task with `task.id`, steps included, and return the stored copy.
    async fn update_task(&self, task: &Task) -> Result<Task, StoreError>;

    async fn toggle_task(&self, id: i64) -> Result<(), StoreError>;

    async fn delete_task(&self, id: i64) -> Result<(), StoreError>;
}
