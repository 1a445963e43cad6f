// common/src/models/compliance.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceStatus {
    pub total_minions: usize,
    pub compliant_minions: usize,
    pub non_compliant_minions: usize,
    pub compliance_percentage: f64,
    pub last_check: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedState {
    pub state_name: String,
    pub state_id: String,
    pub reason: String,
    pub failed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionCompliance {
    pub minion_id: String,
    pub is_compliant: bool,
    #[serde(default)]
    pub failed_states: Vec<FailedState>,
    pub last_highstate: Option<String>,
    pub compliance_score: f64,
}

/// A failed state flattened with the minion it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct MinionFailedState {
    pub minion_id: String,
    #[serde(flatten)]
    pub state: FailedState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftDetection {
    pub minion_id: String,
    /// package, file, service, ...
    pub resource_type: String,
    pub resource_name: String,
    pub expected_value: String,
    pub actual_value: String,
    /// missing, modified, unexpected
    pub drift_type: String,
    pub detected_at: String,
}
