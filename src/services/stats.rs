//! Summary statistics over a snapshot of the risk register.

use serde::Serialize;

use crate::models::risk::{RiskAssessment, RiskLevel};

/// Aggregated statistics for the summary cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    /// Count of High and Critical assessments.
    pub high_critical_count: usize,
    /// Mean score; 0.0 when there are no assessments.
    pub average_score: f64,
    pub by_level: LevelCounts,
}

/// Per-level counts. All four levels are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    #[serde(rename = "Low")]
    pub low: usize,
    #[serde(rename = "Medium")]
    pub medium: usize,
    #[serde(rename = "High")]
    pub high: usize,
    #[serde(rename = "Critical")]
    pub critical: usize,
}

impl LevelCounts {
    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
            RiskLevel::Critical => self.critical,
        }
    }

    fn increment(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Critical => self.critical += 1,
        }
    }
}

/// Reduce a collection into totals, mean score and per-level counts.
///
/// Scores are summed as integers, so the result does not depend on input order.
pub fn aggregate(assessments: &[RiskAssessment]) -> Stats {
    let mut by_level = LevelCounts::default();
    let mut score_sum: u64 = 0;

    for risk in assessments {
        by_level.increment(risk.level());
        score_sum += u64::from(risk.score());
    }

    let total = assessments.len();
    let average_score = if total == 0 {
        0.0
    } else {
        score_sum as f64 / total as f64
    };

    Stats {
        total,
        high_critical_count: by_level.high + by_level.critical,
        average_score,
        by_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::assessment::create_assessment;

    fn risk(id: i64, l: i64, i: i64) -> RiskAssessment {
        create_assessment("Asset", "Threat", l, i).unwrap().with_id(id)
    }

    #[test]
    fn empty_collection() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.high_critical_count, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.by_level, LevelCounts::default());
    }

    #[test]
    fn empty_collection_serializes_all_levels() {
        let json = serde_json::to_value(aggregate(&[])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total": 0,
                "high_critical_count": 0,
                "average_score": 0.0,
                "by_level": {"Low": 0, "Medium": 0, "High": 0, "Critical": 0}
            })
        );
    }

    #[test]
    fn counts_and_mean() {
        // scores: 1 (Low), 12 (Medium), 16 (High), 25 (Critical), 20 (Critical)
        let risks = vec![risk(1, 1, 1), risk(2, 3, 4), risk(3, 4, 4), risk(4, 5, 5), risk(5, 4, 5)];
        let stats = aggregate(&risks);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_level.get(RiskLevel::Low), 1);
        assert_eq!(stats.by_level.get(RiskLevel::Medium), 1);
        assert_eq!(stats.by_level.get(RiskLevel::High), 1);
        assert_eq!(stats.by_level.get(RiskLevel::Critical), 2);
        assert_eq!(stats.high_critical_count, 3);
        assert_eq!(stats.average_score, 74.0 / 5.0);
    }

    #[test]
    fn counts_sum_to_total() {
        let risks: Vec<_> = (1..=5)
            .flat_map(|l| (1..=5).map(move |i| (l, i)))
            .enumerate()
            .map(|(n, (l, i))| risk(n as i64, l, i))
            .collect();
        let stats = aggregate(&risks);
        let sum: usize = RiskLevel::ALL.iter().map(|&lvl| stats.by_level.get(lvl)).sum();
        assert_eq!(sum, stats.total);
        assert_eq!(stats.total, 25);
    }

    #[test]
    fn order_independent() {
        let mut risks = vec![risk(1, 2, 3), risk(2, 5, 5), risk(3, 1, 4), risk(4, 3, 3)];
        let forward = aggregate(&risks);
        risks.reverse();
        assert_eq!(aggregate(&risks), forward);
        risks.rotate_left(1);
        assert_eq!(aggregate(&risks), forward);
    }
}
