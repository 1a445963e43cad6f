// web-server/src/api/events.rs
use actix_web::{get, web, HttpResponse};
use common::models::salt::EventQuery;
use common::Envelope;

use super::run;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_events).service(list_nodegroups).service(list_reactors);
}

#[get("/events")]
pub async fn get_events(
    state: web::Data<AppState>,
    _user: CurrentUser,
    query: web::Query<EventQuery>,
) -> ApiResult<HttpResponse> {
    let tag = query.into_inner().tag;
    let tagmatch = if tag.is_empty() { "*".to_string() } else { tag };

    // state.event blocks until `count` events arrived
    let command = Command::new(Verb::Events).kwarg("tagmatch", tagmatch).kwarg("count", 1);

    let data = run(&state, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[get("/nodegroups")]
pub async fn list_nodegroups(state: web::Data<AppState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::Nodegroups).arg("nodegroups")).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[get("/reactor")]
pub async fn list_reactors(state: web::Data<AppState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::Reactors)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}
