//! Session title derivation.
//!
//! Sessions start with the default title. The first ordinary user message
//! names the session: its first 50 characters, with "..." appended when the
//! message was longer. Titles set by the owner are never replaced.

/// Characters of the first message kept in a derived title.
pub const DERIVED_TITLE_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

/// Derive a session title from a user message.
pub fn derive_title(message: &str) -> String {
    let mut chars = message.chars();
    let head: String = chars.by_ref().take(DERIVED_TITLE_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}{ELLIPSIS}")
    } else {
        head
    }
}
