use serde::{Deserialize, Serialize};

/// Field the remote store sorts task lists by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    DueDate,
    Priority,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::DueDate => "due_date",
            SortMode::Priority => "priority",
        }
    }

    pub fn parse(s: &str) -> Result<SortMode, String> {
        match s {
            "due_date" | "due" => Ok(SortMode::DueDate),
            "priority" => Ok(SortMode::Priority),
            _ => Err(format!(
                "unknown sort mode '{}' (expected: due_date, priority)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Result<SortOrder, String> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("unknown sort order '{}' (expected: asc, desc)", s)),
        }
    }
}

/// Which tasks a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionFilter {
    #[default]
    Incomplete,
    Completed,
    All,
}

impl CompletionFilter {
    /// The `completed` query flag, `None` for no filtering
    pub fn as_flag(self) -> Option<bool> {
        match self {
            CompletionFilter::Incomplete => Some(false),
            CompletionFilter::Completed => Some(true),
            CompletionFilter::All => None,
        }
    }
}

/// How a task list should be filtered and sorted by the remote store.
/// The client only forwards these; it never sorts itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskQuery {
    pub sort: SortMode,
    pub order: SortOrder,
    /// `None` lists both complete and incomplete tasks
    pub completed: Option<bool>,
}

impl TaskQuery {
    /// Query-string pairs in the order the store expects them
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("sort", self.sort.as_str().to_string()),
            ("order", self.order.as_str().to_string()),
        ];
        if let Some(completed) = self.completed {
            pairs.push(("completed", completed.to_string()));
        }
        pairs
    }
}
