//! Prompt assembly for a single chat turn
//!
//! A prompt is always `[system instructions] + bounded history + [user message]`,
//! built fresh for every request.

use serde_json::Value;

use super::turn::Turn;

/// Keep at most the last `window` entries of a client-supplied history.
///
/// A non-array value yields an empty history. The window is taken over the
/// raw array first, so entries before it are never inspected; malformed
/// entries inside the window are dropped.
pub fn bound_history(history: &Value, window: usize) -> Vec<Turn> {
    let Some(entries) = history.as_array() else {
        return Vec::new();
    };

    let start = entries.len().saturating_sub(window);
    entries[start..]
        .iter()
        .filter_map(|entry| {
            let turn = Turn::from_value(entry);
            if turn.is_none() {
                tracing::debug!("Dropping malformed history entry");
            }
            turn
        })
        .collect()
}

/// Build the ordered turn sequence sent to the completion provider
pub fn assemble_prompt(instructions: &str, history: Vec<Turn>, message: &str) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(Turn::system(instructions));
    turns.extend(history);
    turns.push(Turn::user(message));
    turns
}
