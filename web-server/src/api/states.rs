// web-server/src/api/states.rs
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use common::models::salt::{HighstateRequest, StateApplyRequest};
use common::Envelope;

use super::{run, run_audited};
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;
use crate::store::audit::AuditEvent;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_states)
        .service(apply_state)
        .service(apply_highstate)
        .service(state_status);
}

fn outcome(test: bool) -> &'static str {
    if test {
        "tested"
    } else {
        "applied"
    }
}

#[get("/states")]
pub async fn list_states(state: web::Data<AppState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::ListStates).target("*")).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[post("/states/apply")]
pub async fn apply_state(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<StateApplyRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let message = format!("State '{}' {} on {}", body.state, outcome(body.test), body.target);

    let event = AuditEvent::new("state.apply", "state", body.target.clone())
        .detail("state", body.state.clone())
        .detail("test", body.test);
    let command = Command::new(Verb::ApplyState)
        .target(body.target)
        .arg(body.state)
        .kwarg("test", body.test);

    let data = run_audited(&state, &user, &req, event, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}

#[post("/states/highstate")]
pub async fn apply_highstate(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<HighstateRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let message = format!("Highstate {} on {}", outcome(body.test), body.target);

    let event = AuditEvent::new("state.highstate", "state", body.target.clone()).detail("test", body.test);
    let command = Command::new(Verb::Highstate).target(body.target).kwarg("test", body.test);

    let data = run_audited(&state, &user, &req, event, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}

#[get("/states/status/{target}")]
pub async fn state_status(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::StateStatus).target(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}
