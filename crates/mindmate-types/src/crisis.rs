//! Crisis assessment types.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Risk level reported by a crisis classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::None => write!(f, "none"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Outcome of scanning a piece of text for self-harm risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrisisAssessment {
    pub is_crisis: bool,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_message: Option<String>,
}

impl CrisisAssessment {
    /// Assessment for text that carries no detected risk.
    pub fn clear() -> Self {
        Self {
            is_crisis: false,
            risk_level: RiskLevel::None,
            matched_keyword: None,
            safety_message: None,
        }
    }

    /// Assessment for text that matched `keyword`.
    pub fn crisis(keyword: impl Into<String>, safety_message: impl Into<String>) -> Self {
        Self {
            is_crisis: true,
            risk_level: RiskLevel::High,
            matched_keyword: Some(keyword.into()),
            safety_message: Some(safety_message.into()),
        }
    }
}
