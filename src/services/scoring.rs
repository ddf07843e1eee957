//! Likelihood x impact scoring on a 5x5 matrix, aligned with NIST SP 800-30.
//!
//! Score = likelihood * impact (1-25), classified into four levels:
//! - 1-5: Low
//! - 6-12: Medium
//! - 13-18: High
//! - 19-25: Critical

use serde::Serialize;

use crate::errors::{AssessmentError, RatingField};
use crate::models::risk::RiskLevel;

/// Lowest accepted rating for likelihood and impact.
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating for likelihood and impact.
pub const MAX_RATING: i64 = 5;
/// Highest possible score.
pub const MAX_SCORE: i64 = MAX_RATING * MAX_RATING;

/// Inclusive upper bounds of each level.
pub const LOW_MAX: u8 = 5;
pub const MEDIUM_MAX: u8 = 12;
pub const HIGH_MAX: u8 = 18;
pub const CRITICAL_MIN: u8 = 19;

const _: () = assert!(HIGH_MAX + 1 == CRITICAL_MIN, "levels must tile 1-25 without gaps");

/// Score, level, and guidance for a single pair of ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub score: u8,
    pub level: RiskLevel,
    pub hint: &'static str,
}

/// Check a single rating is within 1-5.
pub fn validate_rating(field: RatingField, value: i64) -> Result<u8, AssessmentError> {
    if (MIN_RATING..=MAX_RATING).contains(&value) {
        Ok(value as u8)
    } else {
        Err(AssessmentError::InvalidRating { field })
    }
}

/// Parse a rating from an untyped JSON value.
///
/// Integral floats (`3.0`) are accepted; fractions, strings, booleans and
/// nulls are rejected.
pub fn parse_rating(field: RatingField, value: &serde_json::Value) -> Result<u8, AssessmentError> {
    let invalid = AssessmentError::InvalidRating { field };
    let serde_json::Value::Number(number) = value else {
        return Err(invalid);
    };

    let integral = match number.as_i64() {
        Some(n) => n,
        None => match number.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SCORE as f64 => {
                f as i64
            }
            _ => return Err(invalid),
        },
    };

    validate_rating(field, integral)
}

/// Compute the risk score as likelihood * impact.
pub fn calculate_score(likelihood: i64, impact: i64) -> Result<u8, AssessmentError> {
    let likelihood = validate_rating(RatingField::Likelihood, likelihood)?;
    let impact = validate_rating(RatingField::Impact, impact)?;
    Ok(likelihood * impact)
}

/// Map a score to its level.
pub fn classify_level(score: i64) -> Result<RiskLevel, AssessmentError> {
    if !(1..=MAX_SCORE).contains(&score) {
        return Err(AssessmentError::InvalidScore(score));
    }
    Ok(level_for(score as u8))
}

/// Threshold table shared by record classification and matrix coloring.
///
/// `score` must already be within 1-25.
pub(crate) fn level_for(score: u8) -> RiskLevel {
    if score <= LOW_MAX {
        RiskLevel::Low
    } else if score <= MEDIUM_MAX {
        RiskLevel::Medium
    } else if score < CRITICAL_MIN {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Compliance hint for a level, based on NIST CSF recommendations.
pub fn mitigation_hint(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Accept / monitor - Review during next risk assessment cycle",
        RiskLevel::Medium => "Plan mitigation within 6 months - Document compensating controls",
        RiskLevel::High => {
            "Prioritize action + implement compensating controls (NIST PR.AC-7: Rate Limiting)"
        }
        RiskLevel::Critical => {
            "Immediate mitigation required + executive reporting - Escalate to CISO"
        }
    }
}

/// Full score/level/hint calculation for a pair of ratings.
pub fn assess_risk(likelihood: i64, impact: i64) -> Result<Assessment, AssessmentError> {
    let score = calculate_score(likelihood, impact)?;
    let level = classify_level(i64::from(score))?;
    Ok(Assessment {
        score,
        level,
        hint: mitigation_hint(level),
    })
}
