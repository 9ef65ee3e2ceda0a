use crate::types::{Feed, Result};

/// Pretty-printed JSON array of feed records, in the same flat layout the
/// store persists.
pub fn render_json(feeds: &[Feed]) -> Result<String> {
    Ok(serde_json::to_string_pretty(feeds)?)
}
