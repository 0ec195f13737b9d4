use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::layout_dto::{DiscardPayload, StageChangePayload},
    error::Result,
    middleware::auth::AuthContext,
    services::mcq_backend::BannerUpload,
    utils::upload::{check_banner_image, read_file_field},
    AppState,
};

const BANNER_FIELD: &str = "banner";

#[axum::debug_handler]
pub async fn get_layout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    let view = state.layout_service.refresh(&auth.admin_id).await?;
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn stage_change(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(position): Path<u8>,
    Json(payload): Json<StageChangePayload>,
) -> Result<impl IntoResponse> {
    let view = state
        .layout_service
        .stage_change(&auth.admin_id, position, payload.mcq_set_id)
        .await?;
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(position): Path<u8>,
) -> Result<impl IntoResponse> {
    let sets = state
        .layout_service
        .available_candidates(&auth.admin_id, position)
        .await?;
    Ok(Json(sets))
}

#[axum::debug_handler]
pub async fn commit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    let outcome = state.layout_service.commit(&auth.admin_id).await?;
    Ok(Json(outcome))
}

#[axum::debug_handler]
pub async fn discard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<DiscardPayload>,
) -> Result<impl IntoResponse> {
    let view = state
        .layout_service
        .discard(&auth.admin_id, payload.confirm)
        .await?;
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn upload_banner(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(position): Path<u8>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let file = read_file_field(&mut multipart, BANNER_FIELD, state.max_upload_bytes).await?;
    let content_type = check_banner_image(&file.filename, &file.data)?;
    let set = state
        .layout_service
        .upload_banner(
            &auth.admin_id,
            position,
            BannerUpload {
                filename: file.filename,
                content_type: content_type.to_string(),
                data: file.data,
            },
        )
        .await?;
    Ok(Json(set))
}
