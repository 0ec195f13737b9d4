use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::Result,
    middleware::auth::AuthContext,
    services::validation_service::ValidationService,
    utils::upload::{read_file_field, read_import_document},
    AppState,
};

const IMPORT_FIELD: &str = "file";

/// Validates an uploaded question document without importing anything.
#[axum::debug_handler]
pub async fn validate_questions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let file = read_file_field(&mut multipart, IMPORT_FIELD, state.max_upload_bytes).await?;
    let raw = read_import_document(&file)?;
    let records = ValidationService::parse_document(&raw)?;
    let report = ValidationService::report(&records);
    info!(
        admin_id = %auth.admin_id,
        role = %auth.role,
        filename = %file.filename,
        total = report.summary.total,
        importable = report.summary.importable(),
        errors = report.summary.error,
        "Question document validated"
    );
    Ok(Json(report))
}

#[axum::debug_handler]
pub async fn import_questions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(set_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let file = read_file_field(&mut multipart, IMPORT_FIELD, state.max_upload_bytes).await?;
    let raw = read_import_document(&file)?;
    let records = ValidationService::parse_document(&raw)?;
    let report = ValidationService::report(&records);
    info!(
        admin_id = %auth.admin_id,
        role = %auth.role,
        mcq_set_id = %set_id,
        total = report.summary.total,
        "Question import requested"
    );
    let outcome = state
        .import_service
        .import_batch(&auth.admin_id, &set_id, &report.questions)
        .await?;
    Ok(Json(json!({
        "summary": report.summary,
        "result": outcome,
    })))
}
