//! CSV export of the risk register.

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::risk::RiskAssessment;

const HEADERS: [&str; 7] = ["ID", "Asset", "Threat", "Likelihood", "Impact", "Score", "Level"];

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: i64,
    asset: &'a str,
    threat: &'a str,
    likelihood: u8,
    impact: u8,
    score: u8,
    level: &'static str,
}

impl<'a> From<&'a RiskAssessment> for CsvRow<'a> {
    fn from(risk: &'a RiskAssessment) -> Self {
        Self {
            id: risk.id(),
            asset: risk.asset(),
            threat: risk.threat(),
            likelihood: risk.likelihood(),
            impact: risk.impact(),
            score: risk.score(),
            level: risk.level().as_str(),
        }
    }
}

/// Render assessments as CSV with a header row, in the given order.
pub fn to_csv(risks: &[RiskAssessment]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(HEADERS)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;

    for risk in risks {
        writer
            .serialize(CsvRow::from(risk))
            .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {e}")))
}

/// Download file name for an export taken on `date`.
pub fn file_name(date: NaiveDate) -> String {
    format!("risk-assessment-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::assessment::create_assessment;

    #[test]
    fn header_only_for_empty_register() {
        let bytes = to_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "ID,Asset,Threat,Likelihood,Impact,Score,Level\n"
        );
    }

    #[test]
    fn rows_are_quoted_when_needed() {
        let risks = vec![
            create_assessment("Mail server", "Phishing, spoofing", 4, 3)
                .unwrap()
                .with_id(7),
            create_assessment("Wiki", "Defacement", 1, 1).unwrap().with_id(8),
        ];
        let text = String::from_utf8(to_csv(&risks).unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "7,Mail server,\"Phishing, spoofing\",4,3,12,Medium");
        assert_eq!(lines[2], "8,Wiki,Defacement,1,1,1,Low");
    }

    #[test]
    fn export_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(file_name(date), "risk-assessment-2025-03-09.csv");
    }
}
