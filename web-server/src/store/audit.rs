// web-server/src/store/audit.rs
use chrono::Utc;
use common::models::audit::{AuditLog, AuditQuery, AuditResult};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::Repository;
use crate::error::{ApiError, ApiResult};

pub const DEFAULT_PAGE_LIMIT: usize = 100;
pub const MAX_PAGE_LIMIT: usize = 1000;

/// What happened, recorded by handlers after a mutating call
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: &'static str,
    pub resource_type: &'static str,
    pub resource_id: String,
    pub details: Map<String, Value>,
}

impl AuditEvent {
    pub fn new(action: &'static str, resource_type: &'static str, resource_id: impl Into<String>) -> Self {
        Self {
            action,
            resource_type,
            resource_id: resource_id.into(),
            details: Map::new(),
        }
    }

    pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Clone)]
pub struct AuditTrail {
    logs: Arc<dyn Repository<AuditLog>>,
}

impl AuditTrail {
    pub fn new(logs: Arc<dyn Repository<AuditLog>>) -> Self {
        Self { logs }
    }

    pub fn record(
        &self,
        user: &str,
        event: AuditEvent,
        result: AuditResult,
        ip_address: Option<String>,
    ) -> AuditLog {
        let entry = AuditLog {
            id: self.logs.next_id(),
            timestamp: Utc::now(),
            user: user.to_string(),
            action: event.action.to_string(),
            resource_type: event.resource_type.to_string(),
            resource_id: event.resource_id,
            details: event.details,
            result,
            ip_address,
        };

        tracing::debug!("audit {} {} by {}", entry.action, entry.resource_id, entry.user);
        self.logs.put(&entry.id.clone(), entry.clone());
        entry
    }

    /// Record success or error depending on how an upstream call went
    pub fn record_outcome<T, E>(
        &self,
        user: &str,
        event: AuditEvent,
        ip_address: Option<String>,
        outcome: &Result<T, E>,
    ) {
        let result = if outcome.is_ok() { AuditResult::Success } else { AuditResult::Error };
        self.record(user, event, result, ip_address);
    }

    pub fn get(&self, id: &str) -> Option<AuditLog> {
        self.logs.get(id)
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Filter, sort newest first, then paginate
    pub fn search(&self, query: &AuditQuery) -> ApiResult<Vec<AuditLog>> {
        let (skip, limit) = page(query.skip, query.limit)?;

        let mut logs: Vec<AuditLog> = self
            .logs
            .list()
            .into_iter()
            .filter(|log| query.user.as_ref().map_or(true, |u| &log.user == u))
            .filter(|log| query.action.as_ref().map_or(true, |a| &log.action == a))
            .filter(|log| query.resource_type.as_ref().map_or(true, |r| &log.resource_type == r))
            .collect();

        // ties on timestamp fall back to the allocation order of the id
        logs.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| id_order(&b.id).cmp(&id_order(&a.id)))
        });
        Ok(logs.into_iter().skip(skip).take(limit).collect())
    }

    pub fn actions(&self) -> Vec<String> {
        self.logs
            .list()
            .into_iter()
            .map(|log| log.action)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn id_order(id: &str) -> u64 {
    id.parse().unwrap_or(0)
}

fn page(skip: Option<usize>, limit: Option<usize>) -> ApiResult<(usize, usize)> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }
    Ok((skip.unwrap_or(0), limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRepository;

    fn trail() -> AuditTrail {
        AuditTrail::new(Arc::new(MemoryRepository::new()))
    }

    #[test]
    fn test_record_and_filter() {
        let trail = trail();
        trail.record("admin", AuditEvent::new("job.execute", "job", "*"), AuditResult::Success, None);
        trail.record("ops", AuditEvent::new("key.accept", "key", "minion-3"), AuditResult::Success, None);
        trail.record("ops", AuditEvent::new("job.execute", "job", "web-*"), AuditResult::Error, Some("10.0.0.1".into()));

        let by_ops = trail
            .search(&AuditQuery { user: Some("ops".into()), ..Default::default() })
            .unwrap();
        assert_eq!(by_ops.len(), 2);

        let jobs = trail
            .search(&AuditQuery { action: Some("job.execute".into()), ..Default::default() })
            .unwrap();
        assert_eq!(jobs.len(), 2);
        // newest first
        assert_eq!(jobs[0].resource_id, "web-*");

        assert_eq!(trail.actions(), vec!["job.execute".to_string(), "key.accept".to_string()]);
    }

    #[test]
    fn test_pagination_bounds() {
        let trail = trail();
        for i in 0..5 {
            trail.record("admin", AuditEvent::new("job.execute", "job", i.to_string()), AuditResult::Success, None);
        }

        let page = trail
            .search(&AuditQuery { skip: Some(1), limit: Some(2), ..Default::default() })
            .unwrap();
        assert_eq!(page.len(), 2);

        assert!(trail.search(&AuditQuery { limit: Some(0), ..Default::default() }).is_err());
        assert!(trail.search(&AuditQuery { limit: Some(1001), ..Default::default() }).is_err());
        assert!(trail.search(&AuditQuery { limit: Some(1000), ..Default::default() }).is_ok());
    }
}
