//! Assessment construction and the risk register store: create, list, delete.
//!
//! Derived fields are computed once here and persisted as-is; the store never
//! recomputes them and there is no update path.

use sqlx::PgPool;

use crate::errors::{AppError, AssessmentError, RatingField};
use crate::models::risk::{NewAssessment, RiskAssessment, RiskInput, RiskRecord};
use crate::services::scoring;

/// Validate inputs and derive score and level.
pub fn create_assessment(
    asset: &str,
    threat: &str,
    likelihood: i64,
    impact: i64,
) -> Result<NewAssessment, AssessmentError> {
    let asset = asset.trim();
    if asset.is_empty() {
        return Err(AssessmentError::MissingField("asset"));
    }
    let threat = threat.trim();
    if threat.is_empty() {
        return Err(AssessmentError::MissingField("threat"));
    }

    let score = scoring::calculate_score(likelihood, impact)?;
    let level = scoring::classify_level(i64::from(score))?;

    Ok(NewAssessment {
        asset: asset.to_string(),
        threat: threat.to_string(),
        likelihood: likelihood as u8,
        impact: impact as u8,
        score,
        level,
    })
}

/// Build an assessment from a submitted request body.
pub fn from_input(input: &RiskInput) -> Result<NewAssessment, AssessmentError> {
    let asset = input.asset.as_deref().unwrap_or_default();
    let threat = input.threat.as_deref().unwrap_or_default();

    // Missing text is reported ahead of rating errors.
    if asset.trim().is_empty() {
        return Err(AssessmentError::MissingField("asset"));
    }
    if threat.trim().is_empty() {
        return Err(AssessmentError::MissingField("threat"));
    }
    let likelihood = scoring::parse_rating(RatingField::Likelihood, &input.likelihood)?;
    let impact = scoring::parse_rating(RatingField::Impact, &input.impact)?;

    create_assessment(asset, threat, i64::from(likelihood), i64::from(impact))
}

/// Persist a new assessment; the database assigns the identifier.
pub async fn create(pool: &PgPool, assessment: NewAssessment) -> Result<RiskAssessment, AppError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO risks (asset, threat, likelihood, impact, score, level)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(assessment.asset())
    .bind(assessment.threat())
    .bind(i16::from(assessment.likelihood()))
    .bind(i16::from(assessment.impact()))
    .bind(i16::from(assessment.score()))
    .bind(assessment.level().as_str())
    .fetch_one(pool)
    .await?;

    tracing::info!(
        risk_id = id,
        score = assessment.score(),
        level = %assessment.level(),
        "Risk assessment created"
    );

    Ok(assessment.with_id(id))
}

/// Load a snapshot of the whole register, highest score first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<RiskAssessment>, AppError> {
    let rows = sqlx::query_as::<_, RiskRecord>(
        r#"
        SELECT id, asset, threat, likelihood, impact, score, level
        FROM risks
        ORDER BY score DESC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| RiskAssessment::try_from(row).map_err(|e| AppError::Internal(e.to_string())))
        .collect()
}

/// Fetch a single assessment.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<RiskAssessment, AppError> {
    let row = sqlx::query_as::<_, RiskRecord>(
        "SELECT id, asset, threat, likelihood, impact, score, level FROM risks WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Risk {id} not found")))?;

    RiskAssessment::try_from(row).map_err(|e| AppError::Internal(e.to_string()))
}

/// Delete an assessment by identifier.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM risks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Risk {id} not found")));
    }

    tracing::info!(risk_id = id, "Risk assessment deleted");
    Ok(())
}
