use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::Error, AppState};

const ADMIN_ROLES: [&str; 2] = ["admin", "super_admin"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

/// Who is calling. Resolved once from the bearer token and handed to handlers
/// as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub admin_id: String,
    pub role: String,
}

fn unauthorized(reason: &str) -> Response {
    Error::Unauthorized(reason.to_string()).into_response()
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            let role = data.claims.role.unwrap_or_default();
            if !ADMIN_ROLES.iter().any(|r| r.eq_ignore_ascii_case(&role)) {
                return Error::Forbidden("Admin role required".to_string()).into_response();
            }
            req.extensions_mut().insert(AuthContext {
                admin_id: data.claims.sub,
                role: role.to_ascii_lowercase(),
            });
            next.run(req).await
        }
        Err(_) => unauthorized("invalid_token"),
    }
}
