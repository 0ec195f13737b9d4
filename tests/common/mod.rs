#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tokio::sync::{Notify, Semaphore};

use mcq_backend::{
    dto::import_dto::{BulkImportRequest, BulkImportResponse},
    error::{Error, Result},
    middleware::auth::Claims,
    models::{audit_log::AuditLog, layout::LayoutSlot, mcq_set::McqSet},
    routes::create_router,
    services::mcq_backend::{BannerUpload, McqBackend},
    AppState,
};

pub const JWT_SECRET: &str = "test_secret_key";
pub const ADMIN_ID: &str = "admin-1";
const BOUNDARY: &str = "mcq-test-boundary";

/// In-memory persistence API.
#[derive(Default)]
pub struct FakeBackend {
    pub sets: Mutex<Vec<McqSet>>,
    pub layout: Mutex<BTreeMap<u8, String>>,
    pub imports: Mutex<Vec<BulkImportRequest>>,
    pub failing_positions: Mutex<HashSet<u8>>,
    pub banners: Mutex<Vec<(String, BannerUpload)>>,
    pub audit_logs: Mutex<Vec<AuditLog>>,
    /// When set, uploads wait for a permit after signalling `upload_started`.
    pub upload_gate: Mutex<Option<Arc<Semaphore>>>,
    pub upload_started: Notify,
}

impl FakeBackend {
    pub fn with_sets(ids: &[&str]) -> Self {
        let backend = Self::default();
        *backend.sets.lock().unwrap() = ids.iter().map(|id| set(id)).collect();
        backend
    }

    /// Makes every upload block until the returned semaphore gets a permit.
    pub fn hold_uploads(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.upload_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    async fn wait_at_gate(&self) {
        let gate = self.upload_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            self.upload_started.notify_one();
            let _permit = gate.acquire().await.unwrap();
        }
    }
}

pub fn set(id: &str) -> McqSet {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Set {}", id),
        "timerMode": "TOTAL_TIME",
        "totalTimeLimit": 20,
        "status": "ACTIVE",
    }))
    .unwrap()
}

#[async_trait]
impl McqBackend for FakeBackend {
    async fn list_active_sets(&self) -> Result<Vec<McqSet>> {
        Ok(self.sets.lock().unwrap().clone())
    }

    async fn bulk_import(
        &self,
        _admin_id: String,
        request: BulkImportRequest,
    ) -> Result<BulkImportResponse> {
        self.wait_at_gate().await;
        let count = request.questions.len();
        self.imports.lock().unwrap().push(request);
        Ok(BulkImportResponse {
            success_count: Some(count),
            error: None,
        })
    }

    async fn get_layout(&self) -> Result<Vec<LayoutSlot>> {
        let layout = self.layout.lock().unwrap();
        let sets = self.sets.lock().unwrap();
        Ok(layout
            .iter()
            .map(|(position, id)| LayoutSlot {
                position: *position,
                mcq_set_id: Some(id.clone()),
                mcq_set: sets.iter().find(|s| &s.id == id).cloned(),
            })
            .collect())
    }

    async fn assign_slot(&self, _admin_id: String, mcq_set_id: String, position: u8) -> Result<()> {
        if self.failing_positions.lock().unwrap().contains(&position) {
            return Err(Error::Upstream(format!("Slot {} is locked", position)));
        }
        self.layout.lock().unwrap().insert(position, mcq_set_id);
        Ok(())
    }

    async fn remove_slot(&self, _admin_id: String, position: u8) -> Result<()> {
        if self.failing_positions.lock().unwrap().contains(&position) {
            return Err(Error::Upstream(format!("Slot {} is locked", position)));
        }
        self.layout.lock().unwrap().remove(&position);
        Ok(())
    }

    async fn upload_banner(
        &self,
        _admin_id: String,
        mcq_set_id: String,
        banner: BannerUpload,
    ) -> Result<McqSet> {
        self.wait_at_gate().await;
        let mut updated = set(&mcq_set_id);
        updated.banner_url = Some(format!("/banners/{}", banner.filename));
        self.banners.lock().unwrap().push((mcq_set_id, banner));
        Ok(updated)
    }

    async fn list_audit_logs(&self) -> Result<Vec<AuditLog>> {
        Ok(self.audit_logs.lock().unwrap().clone())
    }
}

pub fn app(backend: Arc<FakeBackend>) -> Router {
    create_router(AppState::new(backend, JWT_SECRET.to_string(), 1024 * 1024))
}

pub fn token(sub: &str, role: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn admin_token() -> String {
    token(ADMIN_ID, "admin")
}

pub fn json_request(method: &str, uri: &str, body: Option<JsonValue>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn multipart_request(uri: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
