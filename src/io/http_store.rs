use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::io::store::{StoreError, TaskStore};
use crate::io::wire::{TaskPayload, decode_task, decode_task_list, error_message};
use crate::model::config::ApiConfig;
use crate::model::query::TaskQuery;
use crate::model::task::Task;

/// REST client for the task store.
pub struct HttpTaskStore {
    client: Client,
    base_url: String,
}

impl HttpTaskStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, StoreError> {
        Self::new(api.url.clone(), Duration::from_secs(api.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the body of a response, mapping non-success statuses to errors.
    /// A 404 on a request about a specific task becomes `NotFound`.
    async fn read_body(response: Response, task_id: Option<i64>) -> Result<String, StoreError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        if status == StatusCode::NOT_FOUND
            && let Some(id) = task_id
        {
            return Err(StoreError::NotFound(id));
        }
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        tracing::info!(
            sort = query.sort.as_str(),
            order = query.order.as_str(),
            completed = ?query.completed,
            "fetching tasks"
        );
        let response = self
            .client
            .get(self.url("/tasks"))
            .query(&query.to_query_pairs())
            .send()
            .await?;
        let body = Self::read_body(response, None).await?;
        Ok(decode_task_list(&body)?)
    }

    async fn get_task(&self, id: i64) -> Result<Task, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;
        let body = Self::read_body(response, Some(id)).await?;
        Ok(decode_task(&body)?)
    }

    async fn create_task(&self, task: &Task) -> Result<Task, StoreError> {
        let mut payload = TaskPayload::from(task);
        payload.id = None;
        tracing::info!(title = %task.title, steps = task.steps.len(), "creating task");
        let response = self
            .client
            .post(self.url("/tasks"))
            .json(&payload)
            .send()
            .await?;
        let body = Self::read_body(response, None).await?;
        Ok(decode_task(&body)?)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, StoreError> {
        let id = task.id.ok_or(StoreError::MissingId)?;
        tracing::info!(id, steps = task.steps.len(), "updating task");
        let response = self
            .client
            .put(self.url(&format!("/tasks/{}", id)))
            .json(&TaskPayload::from(task))
            .send()
            .await?;
        let body = Self::read_body(response, Some(id)).await?;
        Ok(decode_task(&body)?)
    }

    async fn toggle_task(&self, id: i64) -> Result<(), StoreError> {
        tracing::info!(id, "toggling task");
        let response = self
            .client
            .patch(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;
        Self::read_body(response, Some(id)).await?;
        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<(), StoreError> {
        tracing::info!(id, "deleting task");
        let response = self
            .client
            .delete(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;
        Self::read_body(response, Some(id)).await?;
        Ok(())
    }
}
