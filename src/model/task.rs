use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Capitalized label for display ("Low", "Medium", "High")
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Parse a priority name, case-insensitively
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// A single ordered sub-step of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Stable identifier within the task's editing session. `None` for
    /// steps ingested from a source that never assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Step text (may be empty while being typed)
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// 1-based position marker
    pub order: u32,
}

impl Step {
    /// Create an incomplete step. `order` is a placeholder until the owning
    /// list renumbers.
    pub fn new(id: Option<String>, title: impl Into<String>) -> Self {
        Step {
            id: id.filter(|s| !s.is_empty()),
            title: title.into(),
            completed: false,
            order: 1,
        }
    }
}

/// A task as held by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned id; `None` until the task has been created remotely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    /// Derived from steps when there are any, user-set otherwise
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

impl Task {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Task {
            id: None,
            title: title.into(),
            description: None,
            due_date,
            priority: Priority::default(),
            completed: false,
            steps: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert_eq!(Priority::parse(" medium "), Some(Priority::Medium));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        let json = serde_json::to_string(&Priority::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_step_new_drops_empty_id() {
        let step = Step::new(Some(String::new()), "Chop onions");
        assert_eq!(step.id, None);
        assert!(!step.completed);
    }
}
