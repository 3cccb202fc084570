//! Response shaping helpers shared by renderers.

use serde_json::Value;

/// Toggle `id` in a multiSelect selection.
///
/// Removes the id when present, appends it otherwise. Toggling the same id
/// twice restores the original selection.
pub fn toggle_selection(current: &[String], id: &str) -> Vec<String> {
    if current.iter().any(|s| s == id) {
        current.iter().filter(|s| *s != id).cloned().collect()
    } else {
        let mut next = current.to_vec();
        next.push(id.to_string());
        next
    }
}

/// Read a multiSelect response back into a list of ids.
///
/// Anything that is not an array of strings reads as an empty selection.
pub fn selection_from(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
