use serde_json::Value;

use crate::model::task::Step;

/// Why a raw step entry was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepRejection {
    #[error("step is not an object")]
    NotAnObject,
    #[error("step title is not a string: {0}")]
    TitleNotString(Value),
    #[error("step order must be a number >= 1, got {0}")]
    InvalidOrder(Value),
}

/// Check the shape of one raw step. `title` and `order` are optional, but
/// when present they must be a string and a number >= 1 respectively.
pub fn validate_step(raw: &Value) -> Result<(), StepRejection> {
    let obj = raw.as_object().ok_or(StepRejection::NotAnObject)?;

    if let Some(title) = obj.get("title")
        && !title.is_string()
    {
        return Err(StepRejection::TitleNotString(title.clone()));
    }

    if let Some(order) = obj.get("order") {
        match order.as_f64() {
            Some(n) if n >= 1.0 => {}
            _ => return Err(StepRejection::InvalidOrder(order.clone())),
        }
    }

    Ok(())
}

/// Filter a raw steps payload down to well-formed entries, preserving order.
///
/// A payload that is not an array yields an empty list. Rejected entries
/// are logged and dropped; nothing is repaired.
pub fn validate_steps_array(raw: &Value) -> Vec<Value> {
    let Some(entries) = raw.as_array() else {
        tracing::warn!(payload = %raw, "steps must be an array");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter(|(index, entry)| match validate_step(entry) {
            Ok(()) => true,
            Err(reason) => {
                tracing::warn!(index, %reason, "dropping invalid step");
                false
            }
        })
        .map(|(_, entry)| entry.clone())
        .collect()
}

/// Convert a validated entry into a `Step`. Numeric ids become strings;
/// `order` is left as a placeholder for the owning list to renumber.
pub fn step_from_validated(entry: &Value) -> Step {
    let id = match entry.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let title = entry
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let mut step = Step::new(id, title);
    step.completed = entry
        .get("completed")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    step.order = entry
        .get("order")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(1);
    step
}

/// Validate a raw payload and convert what survives.
pub fn steps_from_raw(raw: &Value) -> Vec<Step> {
    validate_steps_array(raw)
        .iter()
        .map(step_from_validated)
        .collect()
}
