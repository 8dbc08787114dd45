//! `mindmate issue-key`: mint an API credential.

use anyhow::Result;
use console::style;

use mindmate_types::chat::Pseudonym;

use crate::http::extractors::auth::issue_credential;
use crate::state::AppState;

/// Issue a key for `pseudonym` (or a random one) and print it once.
///
/// # Examples
///
/// ```bash
/// mindmate issue-key
/// mindmate issue-key --pseudonym anon-42 --json
/// ```
pub async fn issue_key(state: &AppState, pseudonym: Option<String>, json: bool) -> Result<()> {
    let issued = issue_credential(&state.db_pool, pseudonym.map(Pseudonym::new)).await?;

    if json {
        let out = serde_json::json!({
            "key": issued.key,
            "pseudonym": issued.pseudonym.as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} API key for '{}' (save this -- it won't be shown again):",
        style("🔑").bold(),
        style(issued.pseudonym.as_str()).cyan()
    );
    println!();
    println!("  {}", style(&issued.key).yellow().bold());
    println!();
    println!(
        "  Use it as: {}",
        style("Authorization: Bearer <key>").dim()
    );
    println!();

    Ok(())
}
