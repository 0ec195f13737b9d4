use axum::{
    extract::Query,
    response::{IntoResponse, Json},
};

use crate::{
    dto::analytics_dto::{AnalyticsPayload, PeriodQuery},
    error::{Error, Result},
    services::analytics_service::{AnalyticsService, Period},
    utils::time,
};

#[axum::debug_handler]
pub async fn attempt_analytics(
    Query(query): Query<PeriodQuery>,
    Json(payload): Json<AnalyticsPayload>,
) -> Result<impl IntoResponse> {
    let period = Period::parse(query.period.as_deref())?;
    let now = match query.as_of.as_deref() {
        Some(raw) => time::from_rfc3339(raw)
            .map_err(|e| Error::BadRequest(format!("Invalid asOf timestamp: {}", e)))?,
        None => time::now(),
    };
    let attempts = period.filter(payload.attempts, now);
    Ok(Json(AnalyticsService::aggregate(&attempts)))
}
