pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    audit_service::AuditService,
    import_service::ImportService,
    layout_service::LayoutService,
    mcq_backend::{HttpMcqBackend, McqBackend},
};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn McqBackend>,
    pub import_service: ImportService,
    pub layout_service: LayoutService,
    pub audit_service: AuditService,
    pub jwt_secret: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(backend: Arc<dyn McqBackend>, jwt_secret: String, max_upload_bytes: usize) -> Self {
        let import_service = ImportService::new(backend.clone());
        let layout_service = LayoutService::new(backend.clone());
        let audit_service = AuditService::new(backend.clone());

        Self {
            backend,
            import_service,
            layout_service,
            audit_service,
            jwt_secret,
            max_upload_bytes,
        }
    }

    /// Wires the HTTP persistence client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        let backend = HttpMcqBackend::new(
            http_client,
            config.persistence_api_url.clone(),
            config.persistence_api_token.clone(),
        );
        Ok(Self::new(
            Arc::new(backend),
            config.jwt_secret.clone(),
            config.max_upload_bytes,
        ))
    }
}
