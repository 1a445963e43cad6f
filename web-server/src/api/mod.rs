// web-server/src/api/mod.rs
pub mod audit;
pub mod auth;
pub mod beacons;
pub mod cloud;
pub mod compliance;
pub mod events;
pub mod fileserver;
pub mod jobs;
pub mod keys;
pub mod mine;
pub mod minions;
pub mod notifications;
pub mod orchestration;
pub mod pillars;
pub mod runners;
pub mod schedules;
pub mod ssh;
pub mod states;
pub mod system;
pub mod templates;
pub mod webhooks;

use actix_web::{web, HttpRequest};
use common::models::user::User;
use serde_json::Value;

use crate::error::{
    form_error_handler, json_error_handler, path_error_handler, query_error_handler, ApiResult,
};
use crate::salt::Command;
use crate::state::AppState;
use crate::store::audit::AuditEvent;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::FormConfig::default().error_handler(form_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(system::index)
        .service(system::health)
        .service(
            web::scope("/api/v1")
                .service(web::scope("/auth").configure(auth::configure))
                .service(web::scope("/templates").configure(templates::configure))
                .service(web::scope("/audit").configure(audit::configure))
                .service(web::scope("/compliance").configure(compliance::configure))
                .service(web::scope("/notifications").configure(notifications::configure))
                .configure(system::configure)
                .configure(webhooks::configure)
                .configure(minions::configure)
                .configure(jobs::configure)
                .configure(states::configure)
                .configure(pillars::configure)
                .configure(schedules::configure)
                .configure(keys::configure)
                .configure(runners::configure)
                .configure(fileserver::configure)
                .configure(orchestration::configure)
                .configure(beacons::configure)
                .configure(cloud::configure)
                .configure(ssh::configure)
                .configure(events::configure)
                .configure(mine::configure),
        );
}

/// Address of the caller as recorded on the audit trail
pub(crate) fn client_ip(state: &AppState, req: &HttpRequest) -> Option<String> {
    crate::middleware::client_addr(req, state.trust_forwarded_headers)
}

/// Run one salt-api command
pub(crate) async fn run(state: &AppState, command: Command) -> ApiResult<Value> {
    Ok(state.salt.run(command).await?)
}

/// Run one salt-api command and record the outcome on the audit trail
pub(crate) async fn run_audited(
    state: &AppState,
    user: &User,
    req: &HttpRequest,
    event: AuditEvent,
    command: Command,
) -> ApiResult<Value> {
    let outcome = state.salt.run(command).await;
    state.audit.record_outcome(&user.username, event, client_ip(state, req), &outcome);
    Ok(outcome?)
}
