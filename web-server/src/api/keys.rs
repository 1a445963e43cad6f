// web-server/src/api/keys.rs
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use common::Envelope;

use super::{run, run_audited};
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;
use crate::store::audit::AuditEvent;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_keys)
        .service(accept_key)
        .service(reject_key)
        .service(delete_key);
}

#[get("/keys")]
pub async fn list_keys(state: web::Data<AppState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::ListKeys)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

async fn key_action(
    req: &HttpRequest,
    state: &AppState,
    user: &CurrentUser,
    minion_id: String,
    verb: Verb,
    action: &'static str,
    done: &str,
) -> ApiResult<HttpResponse> {
    let message = format!("Key for '{}' {}", minion_id, done);
    let event = AuditEvent::new(action, "key", minion_id.clone());

    let data = run_audited(state, user, req, event, Command::new(verb).target(minion_id)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}

#[post("/keys/{minion_id}/accept")]
pub async fn accept_key(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    key_action(&req, &state, &user, path.into_inner(), Verb::AcceptKey, "key.accept", "accepted").await
}

#[post("/keys/{minion_id}/reject")]
pub async fn reject_key(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    key_action(&req, &state, &user, path.into_inner(), Verb::RejectKey, "key.reject", "rejected").await
}

#[delete("/keys/{minion_id}")]
pub async fn delete_key(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    key_action(&req, &state, &user, path.into_inner(), Verb::DeleteKey, "key.delete", "deleted").await
}
