// web-server/src/api/mine.rs
use actix_web::{get, post, web, HttpResponse};
use common::models::salt::MineRequest;
use common::Envelope;

use super::run;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_mine_data).service(send_mine_data).service(list_returners);
}

#[post("/mine/get")]
pub async fn get_mine_data(
    state: web::Data<AppState>,
    _user: CurrentUser,
    body: web::Json<MineRequest>,
) -> ApiResult<HttpResponse> {
    let MineRequest { target, function } = body.into_inner();
    // mine.get <tgt> <fun>, run on the targeted minions themselves
    let command = Command::new(Verb::MineGet)
        .target(target.as_str())
        .arg(target)
        .arg(function);

    let data = run(&state, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[post("/mine/send")]
pub async fn send_mine_data(
    state: web::Data<AppState>,
    _user: CurrentUser,
    body: web::Json<MineRequest>,
) -> ApiResult<HttpResponse> {
    let MineRequest { target, function } = body.into_inner();
    let message = format!("Sent mine data from {}", target);

    let data = run(&state, Command::new(Verb::MineSend).target(target).arg(function)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}

#[get("/mine/returners")]
pub async fn list_returners(state: web::Data<AppState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::Returners).target("*")).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}
