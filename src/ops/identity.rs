use std::borrow::Cow;

use uuid::Uuid;

use crate::model::task::Step;
use crate::util::unicode::grapheme_prefix;

/// Number of title graphemes that go into a fallback key.
const FALLBACK_TITLE_LEN: usize = 10;

/// Mint a permanent id for a newly created step.
pub fn new_step_id() -> String {
    format!("step-{}", Uuid::new_v4())
}

/// The key a step is tracked by for drag correlation and list rendering.
///
/// Real ids are returned unchanged. Steps without one get a fallback key
/// built from their position, which does not survive a reorder.
pub fn step_key(step: &Step, index: usize) -> Cow<'_, str> {
    match step.id.as_deref() {
        Some(id) if !id.is_empty() => Cow::Borrowed(id),
        _ => Cow::Owned(fallback_step_id(index, Some(&step.title))),
    }
}

/// `fallback-<index>-<titlePart>`: the first ten graphemes of the title with
/// everything except ASCII letters and digits removed, or `untitled` when
/// that leaves nothing.
pub fn fallback_step_id(index: usize, title: Option<&str>) -> String {
    let title_part: String = title
        .map(|t| grapheme_prefix(t, FALLBACK_TITLE_LEN))
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let title_part = if title_part.is_empty() {
        "untitled".to_string()
    } else {
        title_part
    };
    format!("fallback-{}-{}", index, title_part)
}

/// Keys for every step in sequence order.
pub fn step_keys(steps: &[Step]) -> Vec<String> {
    steps
        .iter()
        .enumerate()
        .map(|(i, s)| step_key(s, i).into_owned())
        .collect()
}
