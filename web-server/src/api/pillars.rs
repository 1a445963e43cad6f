// web-server/src/api/pillars.rs
use actix_web::{get, web, HttpResponse};
use common::Envelope;

use super::run;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(pillar_keys).service(pillar_item).service(all_pillars);
}

#[get("/pillars/{target}/keys")]
pub async fn pillar_keys(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::PillarKeys).target(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[get("/pillars/{target}/item/{key}")]
pub async fn pillar_item(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (target, key) = path.into_inner();
    let data = run(&state, Command::new(Verb::PillarItem).target(target).arg(key)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[get("/pillars/{minion_id}")]
pub async fn all_pillars(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let minion_id = path.into_inner();
    let data = run(&state, Command::new(Verb::Pillars).target(&minion_id)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with("minion_id", minion_id)))
}
