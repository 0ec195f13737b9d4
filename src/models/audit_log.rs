use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failure,
    Warning,
}

impl AuditStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => Some(AuditStatus::Success),
            "FAILURE" => Some(AuditStatus::Failure),
            "WARNING" => Some(AuditStatus::Warning),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub resource: String,
    pub user_id: String,
    pub user_role: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub status: AuditStatus,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub metadata: Option<JsonValue>,
}
