use serde::{Deserialize, Serialize};

use crate::ops::identity::step_key;
use crate::ops::step_ops::{StepError, StepList};

/// Drag-end payload from a gesture source. Each side carries the key the
/// dragged step was rendered with (see `identity::step_key`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub over: Option<String>,
}

impl DragEnd {
    pub fn new(active: impl Into<String>, over: impl Into<String>) -> Self {
        DragEnd {
            active: Some(active.into()),
            over: Some(over.into()),
        }
    }
}

/// Why a drag-end did not produce a move
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    #[error("drag event is missing its {0} reference")]
    MissingReference(&'static str),
    #[error("step dropped onto itself")]
    SameReference,
    #[error("no step with key '{0}'")]
    Unresolved(String),
    #[error(transparent)]
    Step(#[from] StepError),
}

impl DragError {
    /// Gestures that legitimately do nothing, as opposed to stale or broken ones.
    pub fn is_benign(&self) -> bool {
        matches!(self, DragError::MissingReference(_) | DragError::SameReference)
    }
}

/// What a drag-end did to the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Moved { from: usize, to: usize },
    Ignored(DragError),
}

/// Index of the step whose current key equals `key`.
pub fn resolve_key(list: &StepList, key: &str) -> Option<usize> {
    list.steps()
        .iter()
        .enumerate()
        .find(|(i, step)| step_key(step, *i) == key)
        .map(|(i, _)| i)
}

/// Resolve both references and move. The list is only touched once both
/// indices are known to be valid.
pub fn try_reorder(list: &mut StepList, event: &DragEnd) -> Result<(usize, usize), DragError> {
    let active = non_empty(event.active.as_deref()).ok_or(DragError::MissingReference("active"))?;
    let over = non_empty(event.over.as_deref()).ok_or(DragError::MissingReference("over"))?;
    if active == over {
        return Err(DragError::SameReference);
    }

    let from = resolve_key(list, active).ok_or_else(|| DragError::Unresolved(active.to_string()))?;
    let to = resolve_key(list, over).ok_or_else(|| DragError::Unresolved(over.to_string()))?;

    list.move_step(from, to)?;
    Ok((from, to))
}

/// Apply a drag-end to the list. Never fails: anything that cannot be
/// applied leaves the list exactly as it was and is reported as `Ignored`.
/// Stale or broken events are also logged at `warn`; benign ones at `debug`.
pub fn handle_drag_end(list: &mut StepList, event: &DragEnd) -> DragOutcome {
    match try_reorder(list, event) {
        Ok((from, to)) => DragOutcome::Moved { from, to },
        Err(err) => {
            if err.is_benign() {
                tracing::debug!(%err, "drag ignored");
            } else {
                tracing::warn!(%err, ?event, "drag could not be applied");
            }
            DragOutcome::Ignored(err)
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Step;
    use std::sync::{Arc, Mutex};

    fn abc() -> StepList {
        StepList::from_steps(vec![
            Step::new(Some("a".into()), "A"),
            Step::new(Some("b".into()), "B"),
            Step::new(Some("c".into()), "C"),
        ])
    }

    fn ids(list: &StepList) -> Vec<&str> {
        list.steps().iter().filter_map(|s| s.id.as_deref()).collect()
    }

    #[test]
    fn test_drag_moves_by_key() {
        let mut list = abc();
        let outcome = handle_drag_end(&mut list, &DragEnd::new("c", "a"));
        assert_eq!(outcome, DragOutcome::Moved { from: 2, to: 0 });
        assert_eq!(ids(&list), vec!["c", "a", "b"]);
        assert_eq!(list.steps()[0].order, 1);
    }

    #[test]
    fn test_drag_onto_self_is_noop() {
        let mut list = abc();
        let before = list.clone();
        let outcome = handle_drag_end(&mut list, &DragEnd::new("b", "b"));
        assert_eq!(outcome, DragOutcome::Ignored(DragError::SameReference));
        assert_eq!(list, before);
    }

    #[test]
    fn test_drag_missing_reference_is_noop() {
        let mut list = abc();
        let before = list.clone();
        let event = DragEnd {
            active: Some("a".into()),
            over: None,
        };
        assert_eq!(
            handle_drag_end(&mut list, &event),
            DragOutcome::Ignored(DragError::MissingReference("over"))
        );
        let event = DragEnd {
            active: Some(String::new()),
            over: Some("a".into()),
        };
        assert_eq!(
            handle_drag_end(&mut list, &event),
            DragOutcome::Ignored(DragError::MissingReference("active"))
        );
        assert_eq!(list, before);
    }

    #[test]
    fn test_drag_stale_reference_is_reported() {
        let mut list = abc();
        let before = list.clone();
        let outcome = handle_drag_end(&mut list, &DragEnd::new("a", "zzz"));
        assert_eq!(
            outcome,
            DragOutcome::Ignored(DragError::Unresolved("zzz".into()))
        );
        assert!(!DragError::Unresolved("zzz".into()).is_benign());
        assert_eq!(list, before);
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logged_while(f: impl FnOnce()) -> String {
        let buf = LogBuffer::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_drag_stale_reference_logs_warning() {
        let mut list = abc();
        let logs = logged_while(|| {
            handle_drag_end(&mut list, &DragEnd::new("a", "zzz"));
        });
        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("no step with key 'zzz'"), "logs: {}", logs);
    }

    #[test]
    fn test_drag_onto_self_does_not_warn() {
        let mut list = abc();
        let logs = logged_while(|| {
            handle_drag_end(&mut list, &DragEnd::new("b", "b"));
        });
        assert!(!logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("drag ignored"), "logs: {}", logs);
    }

    #[test]
    fn test_drag_resolves_fallback_keys() {
        let mut list = StepList::from_steps(vec![
            Step::new(None, "Chop"),
            Step::new(None, "Fry"),
        ]);
        let outcome = handle_drag_end(&mut list, &DragEnd::new("fallback-1-Fry", "fallback-0-Chop"));
        assert_eq!(outcome, DragOutcome::Moved { from: 1, to: 0 });
        assert_eq!(list.steps()[0].title, "Fry");
        // fallback keys follow position, so the old key now names the other step
        assert_eq!(resolve_key(&list, "fallback-1-Fry"), None);
        assert_eq!(resolve_key(&list, "fallback-0-Fry"), Some(0));
    }

    #[test]
    fn test_drag_event_from_json() {
        let event: DragEnd = serde_json::from_str(r#"{"active": "a"}"#).unwrap();
        assert_eq!(event.over, None);
        let mut list = abc();
        assert!(matches!(
            handle_drag_end(&mut list, &event),
            DragOutcome::Ignored(DragError::MissingReference("over"))
        ));
    }
}
