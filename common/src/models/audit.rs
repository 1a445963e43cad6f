// common/src/models/audit.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome recorded on an audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditResult {
    Success,
    Failure,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    /// e.g. `job.execute`, `state.apply`, `key.accept`
    pub action: String,
    /// e.g. `job`, `state`, `key`, `user`
    pub resource_type: String,
    pub resource_id: String,
    #[serde(default)]
    pub details: Map<String, Value>,
    pub result: AuditResult,
    pub ip_address: Option<String>,
}

/// Filters accepted by the audit listing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub user: Option<String>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}
