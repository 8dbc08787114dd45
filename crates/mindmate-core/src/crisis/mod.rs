//! Crisis detection.
//!
//! The chat service consults a [`RiskClassifier`] before any message reaches
//! the AI responder. Today the only implementation is the keyword matcher in
//! [`detector`]; a learned classifier can replace it behind the same trait.

pub mod detector;

use mindmate_types::crisis::CrisisAssessment;

/// Scores a piece of user text for self-harm risk.
///
/// Implementations must be pure: the same text always yields the same
/// assessment and no state is kept between calls.
pub trait RiskClassifier: Send + Sync {
    fn assess(&self, text: &str) -> CrisisAssessment;
}
