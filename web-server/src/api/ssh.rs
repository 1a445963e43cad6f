// web-server/src/api/ssh.rs
use actix_web::{post, web, HttpResponse};
use common::models::salt::SshExecuteRequest;
use common::Envelope;

use super::run;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(execute_ssh);
}

/// Agentless execution through salt-ssh
#[post("/ssh/execute")]
pub async fn execute_ssh(
    state: web::Data<AppState>,
    _user: CurrentUser,
    body: web::Json<SshExecuteRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let message = format!("Executed '{}' on {} via SSH", body.function, body.target);

    let command = Command::new(Verb::SshExecute)
        .target(body.target)
        .function(body.function)
        .extra("roster", body.roster);

    let data = run(&state, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}
