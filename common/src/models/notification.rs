// common/src/models/notification.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Info,
    Warning,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user: String,
    /// job_completed, job_failed, minion_down, compliance_failure, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Always overwritten with the caller's username on update
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub email_enabled: bool,
    pub email_address: Option<String>,
    #[serde(default = "enabled")]
    pub notify_on_job_completion: bool,
    #[serde(default = "enabled")]
    pub notify_on_job_failure: bool,
    #[serde(default = "enabled")]
    pub notify_on_minion_down: bool,
    #[serde(default = "enabled")]
    pub notify_on_compliance_failure: bool,
}

fn enabled() -> bool {
    true
}

impl NotificationSettings {
    pub fn defaults_for(user: &str, email_address: Option<String>) -> Self {
        Self {
            user: user.to_string(),
            email_enabled: false,
            email_address,
            notify_on_job_completion: true,
            notify_on_job_failure: true,
            notify_on_minion_down: true,
            notify_on_compliance_failure: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}
