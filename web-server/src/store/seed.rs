// web-server/src/store/seed.rs
//! Sample records loaded into the in-memory repositories at start-up
use chrono::Utc;
use common::models::{
    audit::{AuditLog, AuditResult},
    compliance::{DriftDetection, FailedState, MinionCompliance},
    notification::{Notification, NotificationSettings, Priority},
    template::JobTemplate,
};
use serde_json::{json, Map, Value};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn audit_logs() -> Vec<(String, AuditLog)> {
    let entry = AuditLog {
        id: "1".to_string(),
        timestamp: Utc::now(),
        user: "admin".to_string(),
        action: "job.execute".to_string(),
        resource_type: "job".to_string(),
        resource_id: "20240113001".to_string(),
        details: object(json!({"function": "test.ping", "target": "*"})),
        result: AuditResult::Success,
        ip_address: Some("192.168.1.100".to_string()),
    };
    vec![(entry.id.clone(), entry)]
}

pub fn notifications() -> Vec<(String, Notification)> {
    let now = Utc::now();
    vec![
        Notification {
            id: "1".to_string(),
            user: "admin".to_string(),
            kind: "job_completed".to_string(),
            title: "Job Completed".to_string(),
            message: "Job test.ping on * completed successfully".to_string(),
            priority: Priority::Info,
            is_read: false,
            created_at: now,
            data: object(json!({"job_id": "20240113001", "function": "test.ping"})),
        },
        Notification {
            id: "2".to_string(),
            user: "admin".to_string(),
            kind: "job_failed".to_string(),
            title: "Job Failed".to_string(),
            message: "Job state.apply on minion-3 failed".to_string(),
            priority: Priority::High,
            is_read: false,
            created_at: now,
            data: object(json!({"job_id": "20240113002", "minion": "minion-3"})),
        },
    ]
    .into_iter()
    .map(|n| (n.id.clone(), n))
    .collect()
}

/// Keyed by username
pub fn notification_settings() -> Vec<(String, NotificationSettings)> {
    let mut admin = NotificationSettings::defaults_for("admin", Some("admin@example.com".to_string()));
    admin.email_enabled = true;
    vec![("admin".to_string(), admin)]
}

/// Keyed by minion id
pub fn compliance() -> Vec<(String, MinionCompliance)> {
    vec![
        MinionCompliance {
            minion_id: "minion-1".to_string(),
            is_compliant: true,
            failed_states: vec![],
            last_highstate: Some("2024-01-13T07:00:00".to_string()),
            compliance_score: 100.0,
        },
        MinionCompliance {
            minion_id: "minion-2".to_string(),
            is_compliant: true,
            failed_states: vec![],
            last_highstate: Some("2024-01-13T06:30:00".to_string()),
            compliance_score: 100.0,
        },
        MinionCompliance {
            minion_id: "minion-3".to_string(),
            is_compliant: false,
            failed_states: vec![FailedState {
                state_name: "webserver.nginx".to_string(),
                state_id: "nginx-install".to_string(),
                reason: "Package nginx not found".to_string(),
                failed_at: "2024-01-13T05:00:00".to_string(),
            }],
            last_highstate: Some("2024-01-13T05:00:00".to_string()),
            compliance_score: 85.0,
        },
    ]
    .into_iter()
    .map(|m| (m.minion_id.clone(), m))
    .collect()
}

pub fn drift() -> Vec<(String, DriftDetection)> {
    vec![(
        "1".to_string(),
        DriftDetection {
            minion_id: "minion-3".to_string(),
            resource_type: "package".to_string(),
            resource_name: "nginx".to_string(),
            expected_value: "1.18.0".to_string(),
            actual_value: "not installed".to_string(),
            drift_type: "missing".to_string(),
            detected_at: "2024-01-13T05:00:00".to_string(),
        },
    )]
}

pub fn templates() -> Vec<(String, JobTemplate)> {
    let template = |id: &str, name: &str, description: &str, function: &str, category: &str| JobTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        target: "*".to_string(),
        function: function.to_string(),
        args: vec![],
        kwargs: Map::new(),
        category: category.to_string(),
        is_public: true,
        created_by: "admin".to_string(),
    };

    vec![
        template("1", "Ping All Minions", "Test connectivity to all minions", "test.ping", "testing"),
        template("2", "Disk Usage Check", "Check disk usage on all minions", "disk.usage", "monitoring"),
        template("3", "Update Package Lists", "Refresh package database", "pkg.refresh_db", "maintenance"),
    ]
    .into_iter()
    .map(|t| (t.id.clone(), t))
    .collect()
}
