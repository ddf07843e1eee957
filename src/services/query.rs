//! Filtering and sorting of the risk register for tabular display.
//!
//! Filtering runs first (level, then free-text search), sorting orders what
//! remains. The sort is stable, so ties keep snapshot order.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::risk::{RiskAssessment, RiskLevel, UnknownLevel};

/// Level filter: everything, or one exact level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LevelFilter {
    #[default]
    All,
    Only(RiskLevel),
}

impl LevelFilter {
    pub fn matches(&self, level: RiskLevel) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == level,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

impl TryFrom<String> for LevelFilter {
    type Error = UnknownLevel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Column the table is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Asset,
    Threat,
    Likelihood,
    Impact,
    #[default]
    Score,
    Level,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Current sort column and direction of a table view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: re-selecting the active field toggles direction,
    /// a new field starts descending.
    pub fn select(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.toggle(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Desc,
            }
        }
    }
}

/// Query parameters for the risk table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiskQuery {
    #[serde(default)]
    pub level: LevelFilter,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub dir: SortDirection,
}

/// Filter and sort a snapshot, returning a new ordered collection.
pub fn query(assessments: &[RiskAssessment], params: &RiskQuery) -> Vec<RiskAssessment> {
    let needle = params
        .search
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let mut results: Vec<RiskAssessment> = assessments
        .iter()
        .filter(|risk| params.level.matches(risk.level()))
        .filter(|risk| matches_search(risk, &needle))
        .cloned()
        .collect();

    results.sort_by(|a, b| params.dir.apply(compare(a, b, params.sort)));
    results
}

/// Case-insensitive substring match against asset, threat, level and score.
///
/// `needle` must already be lowercased; an empty needle matches everything.
pub fn matches_search(risk: &RiskAssessment, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    risk.asset().to_lowercase().contains(needle)
        || risk.threat().to_lowercase().contains(needle)
        || risk.level().as_str().to_lowercase().contains(needle)
        || risk.score().to_string().contains(needle)
}

/// Ascending comparison on a single field.
///
/// Text fields, `level` included, compare case-insensitively by name.
pub fn compare(a: &RiskAssessment, b: &RiskAssessment, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id().cmp(&b.id()),
        SortField::Asset => cmp_ignore_case(a.asset(), b.asset()),
        SortField::Threat => cmp_ignore_case(a.threat(), b.threat()),
        SortField::Likelihood => a.likelihood().cmp(&b.likelihood()),
        SortField::Impact => a.impact().cmp(&b.impact()),
        SortField::Score => a.score().cmp(&b.score()),
        SortField::Level => cmp_ignore_case(a.level().as_str(), b.level().as_str()),
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
