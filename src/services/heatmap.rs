//! 5x5 risk matrix binning.
//!
//! Rows run from impact 5 (row 0) down to impact 1 (row 4); columns run from
//! likelihood 1 (column 0) up to likelihood 5 (column 4), so the most severe
//! corner sits top-right.

use serde::Serialize;

use crate::models::risk::{RiskAssessment, RiskLevel, IMPACT_LABELS, LIKELIHOOD_LABELS};
use crate::services::scoring;

/// Matrix dimension on both axes.
pub const GRID_SIZE: usize = 5;

/// Number of member asset names shown per cell.
pub const PREVIEW_LIMIT: usize = 5;

/// Grid position `(row, col)` for a pair of ratings, if both are in range.
pub fn cell_position(likelihood: u8, impact: u8) -> Option<(usize, usize)> {
    let l = usize::from(likelihood);
    let i = usize::from(impact);
    if !(1..=GRID_SIZE).contains(&l) || !(1..=GRID_SIZE).contains(&i) {
        return None;
    }
    Some((GRID_SIZE - i, l - 1))
}

/// Ratings `(likelihood, impact)` at a grid position.
pub fn cell_coordinates(row: usize, col: usize) -> (u8, u8) {
    let likelihood = (col + 1) as u8;
    let impact = (GRID_SIZE - row) as u8;
    (likelihood, impact)
}

/// Color class of a cell, computed from its coordinates alone.
///
/// Uses the same thresholds as record classification.
pub fn cell_severity(likelihood: u8, impact: u8) -> RiskLevel {
    scoring::level_for(likelihood.saturating_mul(impact))
}

/// Assessments bucketed by their `(likelihood, impact)` coordinate.
#[derive(Debug, Clone)]
pub struct RiskMatrix<'a> {
    cells: [[Vec<&'a RiskAssessment>; GRID_SIZE]; GRID_SIZE],
}

/// Place every assessment into exactly one cell.
pub fn bin(assessments: &[RiskAssessment]) -> RiskMatrix<'_> {
    let mut cells: [[Vec<&RiskAssessment>; GRID_SIZE]; GRID_SIZE] =
        std::array::from_fn(|_| std::array::from_fn(|_| Vec::new()));

    for risk in assessments {
        match cell_position(risk.likelihood(), risk.impact()) {
            Some((row, col)) => cells[row][col].push(risk),
            None => tracing::warn!(
                risk_id = risk.id(),
                likelihood = risk.likelihood(),
                impact = risk.impact(),
                "Skipping risk outside the matrix"
            ),
        }
    }

    RiskMatrix { cells }
}

impl<'a> RiskMatrix<'a> {
    /// Members sharing a pair of ratings; empty when out of range.
    pub fn bucket(&self, likelihood: u8, impact: u8) -> &[&'a RiskAssessment] {
        cell_position(likelihood, impact)
            .and_then(|(row, col)| self.at(row, col))
            .unwrap_or_default()
    }

    fn at(&self, row: usize, col: usize) -> Option<&[&'a RiskAssessment]> {
        self.cells.get(row)?.get(col).map(Vec::as_slice)
    }

    /// Total number of binned assessments.
    pub fn total(&self) -> usize {
        self.cells.iter().flatten().map(Vec::len).sum()
    }

    /// Serializable per-cell summary for the matrix view.
    pub fn summary(&self) -> HeatmapView {
        let rows = (0..GRID_SIZE)
            .map(|row| (0..GRID_SIZE).map(|col| self.cell_summary(row, col)).collect())
            .collect();

        HeatmapView {
            rows,
            total: self.total(),
        }
    }

    fn cell_summary(&self, row: usize, col: usize) -> HeatmapCell {
        let (likelihood, impact) = cell_coordinates(row, col);
        let members = self.bucket(likelihood, impact);
        let preview: Vec<String> = members
            .iter()
            .take(PREVIEW_LIMIT)
            .map(|risk| risk.asset().to_string())
            .collect();

        HeatmapCell {
            likelihood,
            impact,
            likelihood_label: LIKELIHOOD_LABELS[usize::from(likelihood) - 1],
            impact_label: IMPACT_LABELS[usize::from(impact) - 1],
            score: likelihood * impact,
            severity: cell_severity(likelihood, impact),
            count: members.len(),
            remaining: members.len() - preview.len(),
            preview,
        }
    }
}

/// Matrix view: five rows of five cells, impact descending.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapView {
    pub rows: Vec<Vec<HeatmapCell>>,
    pub total: usize,
}

/// A single matrix cell as presented to the visualization.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapCell {
    pub likelihood: u8,
    pub impact: u8,
    pub likelihood_label: &'static str,
    pub impact_label: &'static str,
    pub score: u8,
    pub severity: RiskLevel,
    pub count: usize,
    /// First asset names in the cell, up to [`PREVIEW_LIMIT`].
    pub preview: Vec<String>,
    /// Members not included in `preview`.
    pub remaining: usize,
}
