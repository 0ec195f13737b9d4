use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
    pub status: Option<String>,
    pub action: Option<String>,
    pub search: Option<String>,
}
