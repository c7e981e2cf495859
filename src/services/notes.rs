//! Notes projection
//!
//! The entity's free-text `notes` field is a human-readable rendering
//! of the structured status log, kept only for display. The log table
//! remains the single source of truth; these functions exist so the
//! text can be regenerated from it at any time.

use chrono::{DateTime, Utc};

/// Render one note block for a status change.
/// `old` is `None` on the creation entry.
pub fn render_note_block(
    at: DateTime<Utc>,
    actor_name: &str,
    old: Option<&str>,
    new: &str,
    note: Option<&str>,
) -> String {
    let header = match old {
        Some(old) => format!(
            "[{}] {}: {} -> {}",
            at.format("%Y-%m-%d %H:%M UTC"),
            actor_name,
            old,
            new
        ),
        None => format!(
            "[{}] {}: created ({})",
            at.format("%Y-%m-%d %H:%M UTC"),
            actor_name,
            new
        ),
    };

    match note {
        Some(text) if !text.trim().is_empty() => format!("{}\n  {}", header, text.trim()),
        _ => header,
    }
}

/// Append a block to the existing notes text
pub fn append_note(existing: &str, block: &str) -> String {
    if existing.is_empty() {
        block.to_string()
    } else {
        format!("{}\n{}", existing, block)
    }
}
