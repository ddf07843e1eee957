//! Risk assessment entity: an asset paired with a threat, rated on a 5x5 matrix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AssessmentError;
use crate::services::scoring;

/// Likelihood labels indexed by rating - 1.
pub const LIKELIHOOD_LABELS: [&str; 5] = ["Rare", "Unlikely", "Possible", "Likely", "Almost Certain"];

/// Impact labels indexed by rating - 1.
pub const IMPACT_LABELS: [&str; 5] = ["Negligible", "Minor", "Moderate", "Major", "Critical"];

// -- Severity level --

/// Categorical severity derived from a score. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// All levels in ascending severity.
    pub const ALL: [RiskLevel; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not one of the four known levels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid level '{0}'. Must be one of: Low, Medium, High, Critical")]
pub struct UnknownLevel(pub String);

impl FromStr for RiskLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

// -- Assessment --

/// A validated assessment that has not been stored yet.
///
/// Only obtainable through [`crate::services::assessment::create_assessment`],
/// so `score` and `level` always agree with the ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAssessment {
    pub(crate) asset: String,
    pub(crate) threat: String,
    pub(crate) likelihood: u8,
    pub(crate) impact: u8,
    pub(crate) score: u8,
    pub(crate) level: RiskLevel,
}

impl NewAssessment {
    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn threat(&self) -> &str {
        &self.threat
    }

    pub fn likelihood(&self) -> u8 {
        self.likelihood
    }

    pub fn impact(&self) -> u8 {
        self.impact
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn level(&self) -> RiskLevel {
        self.level
    }

    /// Attach the identifier assigned by the store.
    pub fn with_id(self, id: i64) -> RiskAssessment {
        RiskAssessment {
            id,
            asset: self.asset,
            threat: self.threat,
            likelihood: self.likelihood,
            impact: self.impact,
            score: self.score,
            level: self.level,
        }
    }
}

/// A stored risk assessment. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RiskRecord")]
pub struct RiskAssessment {
    id: i64,
    asset: String,
    threat: String,
    likelihood: u8,
    impact: u8,
    score: u8,
    level: RiskLevel,
}

impl RiskAssessment {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn threat(&self) -> &str {
        &self.threat
    }

    pub fn likelihood(&self) -> u8 {
        self.likelihood
    }

    pub fn impact(&self) -> u8 {
        self.impact
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn level(&self) -> RiskLevel {
        self.level
    }

    /// Mitigation guidance for this assessment's level.
    pub fn hint(&self) -> &'static str {
        scoring::mitigation_hint(self.level)
    }
}

/// Raw record shape shared with the store and API collaborators.
///
/// Converting into [`RiskAssessment`] re-derives `score` and `level` from the
/// ratings and rejects records whose stored values disagree.
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct RiskRecord {
    pub id: i64,
    pub asset: String,
    pub threat: String,
    pub likelihood: i16,
    pub impact: i16,
    pub score: i16,
    pub level: String,
}

/// A record from the store whose derived fields are inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("risk {id}: {source}")]
    Invalid {
        id: i64,
        #[source]
        source: AssessmentError,
    },

    #[error("risk {id}: stored score/level ({stored_score}, {stored_level}) does not match ratings")]
    Inconsistent {
        id: i64,
        stored_score: i16,
        stored_level: String,
    },
}

impl TryFrom<RiskRecord> for RiskAssessment {
    type Error = RecordError;

    fn try_from(record: RiskRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let derived = crate::services::assessment::create_assessment(
            &record.asset,
            &record.threat,
            i64::from(record.likelihood),
            i64::from(record.impact),
        )
        .map_err(|source| RecordError::Invalid { id, source })?;

        if i16::from(derived.score) != record.score || derived.level.as_str() != record.level {
            return Err(RecordError::Inconsistent {
                id,
                stored_score: record.score,
                stored_level: record.level,
            });
        }

        Ok(derived.with_id(id))
    }
}

// -- Request DTO --

/// Request body for submitting a new assessment.
///
/// Ratings are taken as raw JSON values so that fractional, textual, or
/// missing ratings are reported as rating errors. Absent or `null` text is
/// treated as empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskInput {
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub threat: Option<String>,
    #[serde(default)]
    pub likelihood: serde_json::Value,
    #[serde(default)]
    pub impact: serde_json::Value,
}

/// Response DTO: the stored assessment plus its mitigation hint.
#[derive(Debug, Clone, Serialize)]
pub struct RiskView {
    #[serde(flatten)]
    pub risk: RiskAssessment,
    pub hint: &'static str,
}

impl From<RiskAssessment> for RiskView {
    fn from(risk: RiskAssessment) -> Self {
        let hint = risk.hint();
        Self { risk, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(likelihood: i16, impact: i16, score: i16, level: &str) -> RiskRecord {
        RiskRecord {
            id: 1,
            asset: "Payroll DB".to_string(),
            threat: "SQL injection".to_string(),
            likelihood,
            impact,
            score,
            level: level.to_string(),
        }
    }

    #[test]
    fn level_serialization() {
        assert_eq!(serde_json::to_string(&RiskLevel::Critical).unwrap(), "\"Critical\"");
        let level: RiskLevel = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(level, RiskLevel::Medium);
    }

    #[test]
    fn level_from_str() {
        assert_eq!("High".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!("high".parse::<RiskLevel>().is_err());
        assert!("All".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn consistent_record_converts() {
        let risk = RiskAssessment::try_from(record(4, 5, 20, "Critical")).unwrap();
        assert_eq!(risk.id(), 1);
        assert_eq!(risk.score(), 20);
        assert_eq!(risk.level(), RiskLevel::Critical);
    }

    #[test]
    fn inconsistent_record_rejected() {
        let err = RiskAssessment::try_from(record(4, 5, 20, "High")).unwrap_err();
        assert!(matches!(err, RecordError::Inconsistent { id: 1, .. }));

        let err = RiskAssessment::try_from(record(2, 2, 5, "Low")).unwrap_err();
        assert!(matches!(err, RecordError::Inconsistent { .. }));
    }

    #[test]
    fn out_of_range_record_rejected() {
        let err = RiskAssessment::try_from(record(6, 1, 6, "Medium")).unwrap_err();
        assert!(matches!(err, RecordError::Invalid { id: 1, .. }));
    }

    #[test]
    fn deserializes_through_record_validation() {
        let ok: RiskAssessment = serde_json::from_value(json!({
            "id": 3, "asset": "VPN", "threat": "Credential stuffing",
            "likelihood": 3, "impact": 4, "score": 12, "level": "Medium"
        }))
        .unwrap();
        assert_eq!(ok.level(), RiskLevel::Medium);

        let bad = serde_json::from_value::<RiskAssessment>(json!({
            "id": 3, "asset": "VPN", "threat": "Credential stuffing",
            "likelihood": 3, "impact": 4, "score": 25, "level": "Critical"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn view_flattens_record_and_hint() {
        let risk = RiskAssessment::try_from(record(1, 2, 2, "Low")).unwrap();
        let json = serde_json::to_value(RiskView::from(risk)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["score"], 2);
        assert_eq!(json["level"], "Low");
        assert_eq!(
            json["hint"],
            "Accept / monitor - Review during next risk assessment cycle"
        );
    }

    #[test]
    fn input_defaults_missing_fields() {
        let input: RiskInput = serde_json::from_value(json!({ "asset": "CRM" })).unwrap();
        assert_eq!(input.asset.as_deref(), Some("CRM"));
        assert_eq!(input.threat, None);
        assert!(input.likelihood.is_null());

        let input: RiskInput =
            serde_json::from_value(json!({ "asset": null, "threat": "T" })).unwrap();
        assert_eq!(input.asset, None);
    }

    #[test]
    fn labels_cover_every_rating() {
        assert_eq!(LIKELIHOOD_LABELS.len(), 5);
        assert_eq!(LIKELIHOOD_LABELS[0], "Rare");
        assert_eq!(LIKELIHOOD_LABELS[4], "Almost Certain");
        assert_eq!(IMPACT_LABELS[0], "Negligible");
        assert_eq!(IMPACT_LABELS[4], "Critical");
    }
}
