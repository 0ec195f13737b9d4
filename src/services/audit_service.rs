use std::sync::Arc;

use crate::dto::audit_dto::AuditLogQuery;
use crate::error::{Error, Result};
use crate::models::audit_log::{AuditLog, AuditStatus};
use crate::services::mcq_backend::McqBackend;

#[derive(Clone)]
pub struct AuditService {
    backend: Arc<dyn McqBackend>,
}

impl AuditService {
    pub fn new(backend: Arc<dyn McqBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self, query: &AuditLogQuery) -> Result<Vec<AuditLog>> {
        let logs = self.backend.list_audit_logs().await?;
        Self::filter(logs, query)
    }

    /// Applies the query filters and sorts newest first.
    pub fn filter(logs: Vec<AuditLog>, query: &AuditLogQuery) -> Result<Vec<AuditLog>> {
        let status = match query.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") | Some("ALL") => None,
            Some(raw) => Some(AuditStatus::parse(raw).ok_or_else(|| {
                Error::BadRequest(format!("Unknown audit status '{}'", raw))
            })?),
        };
        let action = query
            .action
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case("all"));
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut logs: Vec<AuditLog> = logs
            .into_iter()
            .filter(|log| status.map_or(true, |s| log.status == s))
            .filter(|log| action.map_or(true, |a| log.action.eq_ignore_ascii_case(a)))
            .filter(|log| {
                needle.as_deref().map_or(true, |n| {
                    [
                        log.action.as_str(),
                        log.resource.as_str(),
                        log.user_id.as_str(),
                        log.details.as_deref().unwrap_or(""),
                    ]
                    .iter()
                    .any(|field| field.to_lowercase().contains(n))
                })
            })
            .collect();

        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn log(id: &str, hour: u32, action: &str, status: AuditStatus) -> AuditLog {
        AuditLog {
            id: id.into(),
            timestamp: Utc.with_ymd_and_hms(2026, 10, 18, hour, 0, 0).unwrap(),
            action: action.into(),
            resource: "mcq_set".into(),
            user_id: "admin-1".into(),
            user_role: "ADMIN".into(),
            ip_address: None,
            status,
            details: Some(format!("{} on set", action)),
            metadata: None,
        }
    }

    fn sample() -> Vec<AuditLog> {
        vec![
            log("1", 8, "CREATE", AuditStatus::Success),
            log("2", 10, "DELETE", AuditStatus::Failure),
            log("3", 9, "UPDATE", AuditStatus::Warning),
        ]
    }

    #[test]
    fn no_filters_sorts_newest_first() {
        let logs = AuditService::filter(sample(), &AuditLogQuery::default()).unwrap();
        let ids: Vec<&str> = logs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn filters_combine() {
        let query = AuditLogQuery {
            status: Some("failure".into()),
            action: None,
            search: Some("delete".into()),
        };
        let logs = AuditService::filter(sample(), &query).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, "2");

        let query = AuditLogQuery {
            status: None,
            action: Some("update".into()),
            search: None,
        };
        assert_eq!(AuditService::filter(sample(), &query).unwrap()[0].id, "3");
    }

    #[test]
    fn list_reads_from_backend() {
        let mut backend = crate::services::mcq_backend::MockMcqBackend::new();
        backend
            .expect_list_audit_logs()
            .times(1)
            .returning(|| Ok(sample()));
        let service = AuditService::new(Arc::new(backend));

        let query = AuditLogQuery {
            search: Some("create".into()),
            ..Default::default()
        };
        let logs = tokio_test::block_on(service.list(&query)).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, "1");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let query = AuditLogQuery {
            status: Some("MAYBE".into()),
            ..Default::default()
        };
        assert!(AuditService::filter(sample(), &query).is_err());
    }
}
