use serde::{Deserialize, Serialize};

use super::query::{CompletionFilter, SortMode, SortOrder, TaskQuery};

/// Client configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the task store
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Defaults for `mt list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub show: CompletionFilter,
}

impl ListConfig {
    pub fn query(&self) -> TaskQuery {
        TaskQuery {
            sort: self.sort,
            order: self.order,
            completed: self.show.as_flag(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: default_log_filter(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_filter() -> String {
    "microtask=warn".to_string()
}
