// web-server/src/state.rs
use chrono::{DateTime, Utc};
use common::models::{
    compliance::{DriftDetection, MinionCompliance},
    notification::{Notification, NotificationSettings},
    template::JobTemplate,
};
use common::Config;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::error::ApiError;
use crate::salt::{SaltApi, SaltClient};
use crate::store::{seed, AuditTrail, MemoryRepository, Repository};

/// Everything a handler can reach, built once at start-up and shared as
/// `web::Data<AppState>`
pub struct AppState {
    pub salt: Arc<dyn SaltApi>,
    pub auth: AuthService,
    pub audit: AuditTrail,
    pub notifications: Arc<dyn Repository<Notification>>,
    /// Keyed by username
    pub notification_settings: Arc<dyn Repository<NotificationSettings>>,
    /// Keyed by minion id
    pub compliance: Arc<dyn Repository<MinionCompliance>>,
    pub drift: Arc<dyn Repository<DriftDetection>>,
    pub templates: Arc<dyn Repository<JobTemplate>>,
    pub started_at: DateTime<Utc>,
    /// Read client addresses from forwarding headers
    pub trust_forwarded_headers: bool,
}

impl AppState {
    /// Wire the real salt-api client and the seeded in-memory stores
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let salt = SaltClient::new(&config.salt_api)?;
        Self::with_salt(config, Arc::new(salt))
    }

    /// Same wiring around any `SaltApi`, e.g. a fake in tests
    pub fn with_salt(config: &Config, salt: Arc<dyn SaltApi>) -> Result<Self, ApiError> {
        let auth = AuthService::from_config(&config.auth)?;

        Ok(Self {
            salt,
            auth,
            audit: AuditTrail::new(Arc::new(MemoryRepository::with_records(seed::audit_logs()))),
            notifications: Arc::new(MemoryRepository::with_records(seed::notifications())),
            notification_settings: Arc::new(MemoryRepository::with_records(seed::notification_settings())),
            compliance: Arc::new(MemoryRepository::with_records(seed::compliance())),
            drift: Arc::new(MemoryRepository::with_records(seed::drift())),
            templates: Arc::new(MemoryRepository::with_records(seed::templates())),
            started_at: Utc::now(),
            trust_forwarded_headers: config.server.trust_forwarded_headers,
        })
    }
}
