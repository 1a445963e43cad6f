// web-server/src/api/beacons.rs
use actix_web::{delete, get, post, web, HttpResponse};
use common::models::salt::BeaconConfig;
use common::Envelope;

use super::run;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_beacons).service(add_beacon).service(delete_beacon);
}

#[get("/beacons/{target}")]
pub async fn list_beacons(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::ListBeacons).target(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[post("/beacons")]
pub async fn add_beacon(
    state: web::Data<AppState>,
    _user: CurrentUser,
    body: web::Json<BeaconConfig>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let message = format!("Beacon '{}' added to {}", body.name, body.target);

    let command = Command::new(Verb::AddBeacon)
        .target(body.target)
        .arg(body.name)
        .kwarg("beacon_data", body.config);

    let data = run(&state, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}

#[delete("/beacons/{target}/{name}")]
pub async fn delete_beacon(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (target, name) = path.into_inner();
    let message = format!("Beacon '{}' deleted from {}", name, target);

    let data = run(&state, Command::new(Verb::DeleteBeacon).target(target).arg(name)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}
