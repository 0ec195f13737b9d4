use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};

use crate::{dto::audit_dto::AuditLogQuery, error::Result, AppState};

#[axum::debug_handler]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQuery>,
) -> Result<impl IntoResponse> {
    let logs = state.audit_service.list(&query).await?;
    Ok(Json(logs))
}
