use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{info, warn};

use crate::dto::import_dto::{BulkImportRequest, BulkImportResponse};
use crate::dto::layout_dto::AssignSlotRequest;
use crate::error::{Error, Result};
use crate::models::audit_log::AuditLog;
use crate::models::layout::LayoutSlot;
use crate::models::mcq_set::McqSet;

const ADMIN_ID_HEADER: &str = "x-admin-id";

#[derive(Debug, Clone)]
pub struct BannerUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// The persistence API that owns sets, questions, layout slots and audit logs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait McqBackend: Send + Sync {
    async fn list_active_sets(&self) -> Result<Vec<McqSet>>;

    async fn bulk_import(
        &self,
        admin_id: String,
        request: BulkImportRequest,
    ) -> Result<BulkImportResponse>;

    async fn get_layout(&self) -> Result<Vec<LayoutSlot>>;

    async fn assign_slot(&self, admin_id: String, mcq_set_id: String, position: u8)
        -> Result<()>;

    async fn remove_slot(&self, admin_id: String, position: u8) -> Result<()>;

    async fn upload_banner(
        &self,
        admin_id: String,
        mcq_set_id: String,
        banner: BannerUpload,
    ) -> Result<McqSet>;

    async fn list_audit_logs(&self) -> Result<Vec<AuditLog>>;
}

#[derive(Clone)]
pub struct HttpMcqBackend {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutEnvelope {
    Slots(Vec<LayoutSlot>),
    Wrapped { layout: Vec<LayoutSlot> },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpMcqBackend {
    pub fn new(client: Client, base_url: String, api_token: Option<String>) -> Self {
        info!("Persistence API base URL: {}", base_url);
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Turns a non-success response into `Error::Upstream`, preferring the `{error}` body.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => format!("HTTP error {}", status),
        Err(_) => format!("HTTP error {}: {}", status, body),
    };
    warn!("Persistence API returned {}: {}", status, message);
    Err(Error::Upstream(message))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl McqBackend for HttpMcqBackend {
    async fn list_active_sets(&self) -> Result<Vec<McqSet>> {
        let response = self
            .request(Method::GET, "/api/mcq/sets")
            .query(&[("status", "ACTIVE")])
            .send()
            .await?;
        read_json(response).await
    }

    async fn bulk_import(
        &self,
        admin_id: String,
        request: BulkImportRequest,
    ) -> Result<BulkImportResponse> {
        let response = self
            .request(Method::POST, "/api/mcq/questions/bulk")
            .header(ADMIN_ID_HEADER, admin_id)
            .json(&request)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_layout(&self) -> Result<Vec<LayoutSlot>> {
        let response = self
            .request(Method::GET, "/api/admin/mcq/layout")
            .send()
            .await?;
        let slots = match read_json::<LayoutEnvelope>(response).await? {
            LayoutEnvelope::Slots(slots) => slots,
            LayoutEnvelope::Wrapped { layout } => layout,
        };
        Ok(slots)
    }

    async fn assign_slot(
        &self,
        admin_id: String,
        mcq_set_id: String,
        position: u8,
    ) -> Result<()> {
        let response = self
            .request(Method::POST, "/api/admin/mcq/layout")
            .header(ADMIN_ID_HEADER, admin_id)
            .json(&AssignSlotRequest {
                mcq_set_id,
                position,
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn remove_slot(&self, admin_id: String, position: u8) -> Result<()> {
        let response = self
            .request(Method::DELETE, "/api/admin/mcq/layout")
            .header(ADMIN_ID_HEADER, admin_id)
            .query(&[("position", position)])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn upload_banner(
        &self,
        admin_id: String,
        mcq_set_id: String,
        banner: BannerUpload,
    ) -> Result<McqSet> {
        let part = reqwest::multipart::Part::bytes(banner.data.to_vec())
            .file_name(banner.filename)
            .mime_str(&banner.content_type)?;
        let form = reqwest::multipart::Form::new().part("banner", part);

        let response = self
            .request(
                Method::POST,
                &format!("/api/admin/mcq/sets/{}/banner", mcq_set_id),
            )
            .header(ADMIN_ID_HEADER, admin_id)
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    async fn list_audit_logs(&self) -> Result<Vec<AuditLog>> {
        let response = self
            .request(Method::GET, "/api/admin/audit-logs")
            .send()
            .await?;
        read_json(response).await
    }
}
