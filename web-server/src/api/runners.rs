// web-server/src/api/runners.rs
use actix_web::{get, post, web, HttpResponse};
use common::models::salt::{CatalogEntry, RunnerRequest};
use common::Envelope;
use serde_json::json;

use super::run;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(execute_runner).service(common_runners);
}

const fn runner(name: &'static str, description: &'static str, category: &'static str) -> CatalogEntry {
    CatalogEntry {
        name,
        description,
        category: Some(category),
        target: None,
    }
}

const COMMON_RUNNERS: [CatalogEntry; 6] = [
    runner("manage.status", "Show minion status (up/down)", "management"),
    runner("manage.versions", "Show Salt versions of minions", "management"),
    runner("jobs.active", "Show active jobs", "jobs"),
    runner("jobs.list_jobs", "List all jobs", "jobs"),
    runner("state.orchestrate", "Run orchestration", "orchestration"),
    runner("cache.clear_all", "Clear all caches", "cache"),
];

#[post("/runners/execute")]
pub async fn execute_runner(
    state: web::Data<AppState>,
    _user: CurrentUser,
    body: web::Json<RunnerRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let message = format!("Runner '{}' executed", body.runner);

    let data = run(&state, Command::new(Verb::Runner).function(body.runner).args(body.args)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}

#[get("/runners/common")]
pub async fn common_runners(_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "runners": COMMON_RUNNERS,
    }))
}
