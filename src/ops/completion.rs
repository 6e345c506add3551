use crate::model::task::Step;

/// Aggregate completion of a step sequence: `Some(true)` when every step is
/// done, `Some(false)` when any is not, `None` for an empty sequence (the
/// task's own flag stands).
pub fn derive_completion(steps: &[Step]) -> Option<bool> {
    if steps.is_empty() {
        None
    } else {
        Some(steps.iter().all(|s| s.completed))
    }
}

/// The completion a task should carry given its steps and its current flag.
pub fn resolve_completion(steps: &[Step], current: bool) -> bool {
    derive_completion(steps).unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(flags: &[bool]) -> Vec<Step> {
        flags
            .iter()
            .map(|&done| {
                let mut s = Step::new(None, "s");
                s.completed = done;
                s
            })
            .collect()
    }

    #[test]
    fn test_all_done() {
        assert_eq!(derive_completion(&steps(&[true, true])), Some(true));
    }

    #[test]
    fn test_one_pending() {
        assert_eq!(derive_completion(&steps(&[true, false])), Some(false));
    }

    #[test]
    fn test_empty_keeps_caller_flag() {
        assert_eq!(derive_completion(&[]), None);
        assert!(resolve_completion(&[], true));
        assert!(!resolve_completion(&[], false));
    }

    #[test]
    fn test_steps_override_caller_flag() {
        assert!(!resolve_completion(&steps(&[false]), true));
        assert!(resolve_completion(&steps(&[true]), false));
    }
}
