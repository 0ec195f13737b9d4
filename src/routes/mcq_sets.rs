use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use tracing::error;

use crate::{dto::mcq_set_dto::McqSetView, error::Result, AppState};

#[axum::debug_handler]
pub async fn list_sets(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let sets = state.backend.list_active_sets().await?;
    let views = sets
        .into_iter()
        .map(|set| {
            McqSetView::try_from_set(set).map_err(|e| {
                error!(error = %e, "MCQ set has no usable timer mode");
                e
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(views))
}
