//! `mindmate screen`: run the crisis detector over arbitrary text.
//!
//! Uses the keyword list from the loaded configuration, so it shows
//! exactly what the running server would decide.

use anyhow::Result;
use console::style;

use mindmate_core::crisis::detector::KeywordCrisisDetector;
use mindmate_core::crisis::RiskClassifier;
use mindmate_types::config::AppConfig;
use mindmate_types::crisis::CrisisAssessment;

/// Screen `text` and print the assessment.
pub fn screen(config: &AppConfig, text: &str, json: bool) -> Result<()> {
    let detector = KeywordCrisisDetector::from_config(&config.crisis);
    let assessment = detector.assess(text);

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    print_assessment(&assessment);
    Ok(())
}

fn print_assessment(assessment: &CrisisAssessment) {
    println!();
    if !assessment.is_crisis {
        println!(
            "  {} No crisis indicators (risk: {})",
            style("✓").green(),
            assessment.risk_level
        );
        println!();
        return;
    }

    println!(
        "  {} Crisis indicators detected (risk: {})",
        style("!").red().bold(),
        style(assessment.risk_level).red().bold()
    );
    if let Some(keyword) = &assessment.matched_keyword {
        println!("  Matched:  {}", style(format!("\"{keyword}\"")).yellow());
    }
    if let Some(message) = &assessment.safety_message {
        println!();
        for line in message.lines() {
            println!("  {}", style(line).dim());
        }
    }
    println!();
}
