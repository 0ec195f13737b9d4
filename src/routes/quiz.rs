use axum::{extract::Json, response::IntoResponse};
use validator::Validate;

use crate::{dto::quiz_dto::ScoreRequest, error::Result, services::scoring_service::ScoringService};

#[axum::debug_handler]
pub async fn score_quiz(Json(payload): Json<ScoreRequest>) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = ScoringService::score(
        &payload.questions,
        &payload.answers,
        payload.time_taken_seconds,
    );
    Ok(Json(result))
}
