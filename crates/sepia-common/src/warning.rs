//! Deduplicated engine warnings.
//!
//! A single document can trip over the same unsupported construct hundreds of
//! times (one selector repeated across rules, one malformed attribute copied
//! onto every element). Warnings are routed through `tracing` and printed once
//! per unique `(component, message)` pair.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about unsupported or malformed input (emitted once per unique message).
///
/// # Example
/// ```
/// use sepia_common::warning::warn_once;
///
/// warn_once("selector", "unsupported pseudo-class ':hover'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_emit {
        tracing::warn!(component, "{message}");
    }
}

/// Returns true if this exact warning has already been emitted.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Forget all recorded warnings (call before processing a new document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        warn_once("test", "recorded once");
        assert!(has_warned("test", "recorded once"));
        assert!(!has_warned("test", "never emitted"));
    }

    #[test]
    fn test_components_are_distinct_keys() {
        warn_once("css", "shared text");
        assert!(has_warned("css", "shared text"));
        assert!(!has_warned("html", "shared text"));
    }
}
