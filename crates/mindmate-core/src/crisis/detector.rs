//! Keyword-based crisis detector.
//!
//! Lowercases the input and checks each configured phrase, in list order, as
//! a substring. The first *list entry* found wins, regardless of where it
//! occurs in the text, so `matched_keyword` is stable when several phrases
//! appear together.

use mindmate_types::config::CrisisConfig;
use mindmate_types::crisis::CrisisAssessment;

use super::RiskClassifier;

/// Substring matcher over an ordered, immutable phrase list.
#[derive(Debug, Clone)]
pub struct KeywordCrisisDetector {
    /// Lowercased, trimmed, non-empty phrases in priority order.
    keywords: Vec<String>,
    safety_message: String,
}

impl KeywordCrisisDetector {
    pub fn new<I, S>(keywords: I, safety_message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            keywords,
            safety_message: safety_message.into().trim().to_string(),
        }
    }

    pub fn from_config(config: &CrisisConfig) -> Self {
        Self::new(&config.keywords, config.safety_message.clone())
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordCrisisDetector {
    fn default() -> Self {
        Self::from_config(&CrisisConfig::default())
    }
}

impl RiskClassifier for KeywordCrisisDetector {
    fn assess(&self, text: &str) -> CrisisAssessment {
        if text.trim().is_empty() {
            return CrisisAssessment::clear();
        }

        let normalized = text.to_lowercase();
        match self.keywords.iter().find(|k| normalized.contains(k.as_str())) {
            Some(keyword) => CrisisAssessment::crisis(keyword.clone(), self.safety_message.clone()),
            None => CrisisAssessment::clear(),
        }
    }
}
