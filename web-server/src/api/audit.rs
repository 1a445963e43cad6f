// web-server/src/api/audit.rs
use actix_web::{get, web};
use common::models::audit::{AuditLog, AuditQuery};
use serde::Deserialize;

use crate::auth::{AdminOrAuditor, Authorized};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_actions)
        .service(user_logs)
        .service(list_logs)
        .service(get_log);
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

/// Newest first, filtered by user, action and resource type
#[get("")]
pub async fn list_logs(
    state: web::Data<AppState>,
    _auditor: Authorized<AdminOrAuditor>,
    query: web::Query<AuditQuery>,
) -> ApiResult<web::Json<Vec<AuditLog>>> {
    Ok(web::Json(state.audit.search(&query)?))
}

#[get("/{log_id}")]
pub async fn get_log(
    state: web::Data<AppState>,
    _auditor: Authorized<AdminOrAuditor>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AuditLog>> {
    state
        .audit
        .get(&path)
        .map(web::Json)
        .ok_or_else(|| ApiError::not_found("Audit log"))
}

#[get("/users/{username}")]
pub async fn user_logs(
    state: web::Data<AppState>,
    _auditor: Authorized<AdminOrAuditor>,
    path: web::Path<String>,
    page: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<AuditLog>>> {
    let page = page.into_inner();
    let query = AuditQuery {
        user: Some(path.into_inner()),
        skip: page.skip,
        limit: page.limit,
        ..Default::default()
    };
    Ok(web::Json(state.audit.search(&query)?))
}

#[get("/actions/list")]
pub async fn list_actions(
    state: web::Data<AppState>,
    _auditor: Authorized<AdminOrAuditor>,
) -> web::Json<Vec<String>> {
    web::Json(state.audit.actions())
}
