pub mod analytics;
pub mod audit;
pub mod health;
pub mod layout;
pub mod mcq_sets;
pub mod questions;
pub mod quiz;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{middleware::auth::require_admin, AppState};

/// Multipart framing on top of the largest accepted file.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let admin_api = Router::new()
        .route(
            "/api/admin/mcq/questions/validate",
            post(questions::validate_questions),
        )
        .route(
            "/api/admin/mcq/sets/:id/questions/import",
            post(questions::import_questions),
        )
        .route("/api/admin/mcq/sets", get(mcq_sets::list_sets))
        .route("/api/admin/mcq/layout", get(layout::get_layout))
        .route("/api/admin/mcq/layout/commit", post(layout::commit))
        .route("/api/admin/mcq/layout/discard", post(layout::discard))
        .route("/api/admin/mcq/layout/:position", put(layout::stage_change))
        .route(
            "/api/admin/mcq/layout/:position/candidates",
            get(layout::list_candidates),
        )
        .route(
            "/api/admin/mcq/layout/:position/banner",
            post(layout::upload_banner),
        )
        .route("/api/admin/mcq/analytics", post(analytics::attempt_analytics))
        .route("/api/admin/audit-logs", get(audit::list_audit_logs))
        .layer(from_fn_with_state(state.clone(), require_admin));

    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/quiz/score", post(quiz::score_quiz));

    let body_limit = state.max_upload_bytes + BODY_LIMIT_SLACK;

    public_api
        .merge(admin_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}
