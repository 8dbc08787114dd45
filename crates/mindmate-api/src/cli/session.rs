//! `mindmate sessions`: list a pseudonym's sessions as a table.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use mindmate_types::chat::{ChatSession, Pseudonym, SessionStatus};

use crate::state::AppState;

/// List the sessions owned by `pseudonym`, most recently active first.
///
/// # Examples
///
/// ```bash
/// mindmate sessions --pseudonym anon-42
/// mindmate sessions --pseudonym anon-42 --json
/// ```
pub async fn list_sessions(state: &AppState, pseudonym: &str, json: bool) -> Result<()> {
    let owner = Pseudonym::new(pseudonym);
    let sessions = state.chat_service.list_sessions(&owner).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions found for '{}'.",
            style("i").blue().bold(),
            style(pseudonym).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("  Sessions for '{}'", style(pseudonym).cyan().bold());
    println!();
    println!("{}", render_table(&sessions));
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn render_table(sessions: &[ChatSession]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Started").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
        Cell::new("Status").fg(Color::White),
    ]);

    for session in sessions {
        table.add_row(vec![
            Cell::new(session.id.to_string()).fg(Color::DarkGrey),
            Cell::new(truncate_title(&session.title)).fg(Color::Cyan),
            Cell::new(session.started_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(session.last_message_at.format("%Y-%m-%d %H:%M").to_string()),
            status_cell(session.status),
        ]);
    }

    table
}

fn status_cell(status: SessionStatus) -> Cell {
    let color = match status {
        SessionStatus::Active => Color::Green,
        SessionStatus::Locked => Color::Red,
        SessionStatus::Archived | SessionStatus::Completed => Color::DarkGrey,
    };
    Cell::new(status.to_string()).fg(color)
}

/// Shorten a title for display, on a char boundary.
fn truncate_title(title: &str) -> String {
    const MAX: usize = 40;
    if title.chars().count() > MAX {
        let head: String = title.chars().take(MAX - 3).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Short"), "Short");
        let long = "é".repeat(60);
        let out = truncate_title(&long);
        assert_eq!(out.chars().count(), 40);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_table_has_row_per_session() {
        let sessions = vec![
            ChatSession::new(Pseudonym::from("anon-a"), Some("One")),
            ChatSession::new(Pseudonym::from("anon-a"), None),
        ];
        let rendered = render_table(&sessions).to_string();
        assert!(rendered.contains("One"));
        assert!(rendered.contains("New Conversation"));
        assert!(rendered.contains("active"));
    }
}
