// web-server/src/api/orchestration.rs
use actix_web::{get, post, web, HttpResponse};
use common::models::salt::{CatalogEntry, OrchestrationRequest};
use common::Envelope;
use serde_json::json;

use super::run;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(run_orchestration).service(common_orchestrations);
}

const fn orchestration(name: &'static str, description: &'static str, target: &'static str) -> CatalogEntry {
    CatalogEntry {
        name,
        description,
        category: None,
        target: Some(target),
    }
}

const COMMON_ORCHESTRATIONS: [CatalogEntry; 3] = [
    orchestration("deploy.webapp", "Deploy web application", "web-*"),
    orchestration("upgrade.system", "System upgrade orchestration", "*"),
    orchestration("provision.stack", "Provision full application stack", "*"),
];

#[post("/orchestration/run")]
pub async fn run_orchestration(
    state: web::Data<AppState>,
    _user: CurrentUser,
    body: web::Json<OrchestrationRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let message = format!("Orchestration '{}' executed on {}", body.orchestration, body.target);

    // the orchestration SLS reads its target from pillar
    let command = Command::new(Verb::Orchestrate)
        .arg(body.orchestration)
        .kwarg("pillar", json!({ "target": body.target }));

    let data = run(&state, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}

#[get("/orchestration/common")]
pub async fn common_orchestrations(_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "orchestrations": COMMON_ORCHESTRATIONS,
    }))
}
