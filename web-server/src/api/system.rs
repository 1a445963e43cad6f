// web-server/src/api/system.rs
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::auth::CurrentUser;
use crate::state::AppState;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health).service(stats);
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to SaltShark API",
        "version": VERSION,
    }))
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

/// Liveness probe under the versioned prefix
#[get("/health")]
pub async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": VERSION,
    }))
}

#[get("/stats")]
pub async fn stats(state: web::Data<AppState>, _user: CurrentUser) -> impl Responder {
    let now = Utc::now();
    let uptime = (now - state.started_at).num_seconds();

    HttpResponse::Ok().json(json!({
        "success": true,
        "stats": {
            "server": {
                "version": VERSION,
                "started_at": state.started_at.to_rfc3339(),
                "uptime_seconds": uptime,
            },
            "users": {
                "registered": state.auth.users().list().len(),
            },
            "audit_entries": state.audit.len(),
            "templates": state.templates.len(),
            "timestamp": now.to_rfc3339(),
        },
    }))
}
