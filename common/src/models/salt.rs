// common/src/models/salt.rs
//! Request bodies accepted by the proxy routers and the local shapes
//! salt-api results are reshaped into.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn all_minions() -> String {
    "*".to_string()
}

fn flat_roster() -> String {
    "flat".to_string()
}

fn base_env() -> String {
    "base".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionStatus {
    pub id: String,
    pub os: Option<String>,
    pub osrelease: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionDetail {
    #[serde(flatten)]
    pub status: MinionStatus,
    pub grains: Option<Value>,
    pub pillars: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionList {
    pub minions: Vec<MinionStatus>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub jid: String,
    pub function: String,
    #[serde(default)]
    pub minions: Vec<String>,
    pub start_time: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    #[serde(flatten)]
    pub status: JobStatus,
    pub end_time: Option<String>,
    pub result: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobList {
    pub jobs: Vec<JobStatus>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrainsData {
    pub minion_id: String,
    pub grains: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarsData {
    pub minion_id: String,
    pub pillars: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobExecuteRequest {
    /// Glob pattern addressing the target minions
    pub target: String,
    pub function: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateApplyRequest {
    pub target: String,
    pub state: String,
    /// Dry run
    #[serde(default)]
    pub test: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighstateRequest {
    pub target: String,
    #[serde(default)]
    pub test: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    pub target: String,
    pub name: String,
    pub function: String,
    /// cron, seconds/minutes/hours, splay, ...
    pub schedule: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerRequest {
    pub runner: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrchestrationRequest {
    pub orchestration: String,
    #[serde(default = "all_minions")]
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeaconConfig {
    pub name: String,
    #[serde(default = "all_minions")]
    pub target: String,
    pub config: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudInstanceRequest {
    pub profile: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SshExecuteRequest {
    pub target: String,
    pub function: String,
    #[serde(default = "flat_roster")]
    pub roster: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MineRequest {
    pub target: String,
    pub function: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileListQuery {
    #[serde(default = "base_env")]
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileContentQuery {
    pub path: String,
    #[serde(default = "base_env")]
    pub environment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudProfileQuery {
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    #[serde(default)]
    pub tag: String,
}

/// Entry of the static runner/orchestration catalogs
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'static str>,
}
