// web-server/src/api/minions.rs
use actix_web::{get, web, HttpResponse};
use common::models::salt::{GrainsData, MinionDetail, MinionList, MinionStatus, PillarsData};
use serde_json::{Map, Value};

use super::run;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::salt::{first_return, Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_minions)
        .service(get_minion)
        .service(get_grains)
        .service(get_pillars);
}

fn text(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_string)
}

fn status(id: &str, data: &Value) -> MinionStatus {
    MinionStatus {
        id: id.to_string(),
        os: text(data, "os"),
        osrelease: text(data, "osrelease"),
        status: Some(text(data, "status").unwrap_or_else(|| "unknown".to_string())),
    }
}

/// Value for `minion_id` in a per-minion result, empty object when missing
fn for_minion(response: &Value, minion_id: &str) -> Value {
    first_return(response)
        .get(minion_id)
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

#[get("/minions")]
pub async fn list_minions(state: web::Data<AppState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    let response = run(&state, Command::new(Verb::ListMinions)).await?;

    let minions: Vec<MinionStatus> = first_return(&response)
        .as_object()
        .map(|nodes| nodes.iter().map(|(id, data)| status(id, data)).collect())
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(MinionList { total: minions.len(), minions }))
}

#[get("/minions/{minion_id}")]
pub async fn get_minion(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let minion_id = path.into_inner();
    let response = run(&state, Command::new(Verb::GetMinion).resource_id(&minion_id)).await?;

    let data = for_minion(&response, &minion_id);
    if data.as_object().map_or(true, Map::is_empty) {
        return Err(ApiError::not_found("Minion"));
    }

    Ok(HttpResponse::Ok().json(MinionDetail {
        status: status(&minion_id, &data),
        grains: data.get("grains").cloned(),
        pillars: data.get("pillars").cloned(),
    }))
}

#[get("/minions/{minion_id}/grains")]
pub async fn get_grains(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let minion_id = path.into_inner();
    let response = run(&state, Command::new(Verb::Grains).target(&minion_id)).await?;

    Ok(HttpResponse::Ok().json(GrainsData {
        grains: for_minion(&response, &minion_id),
        minion_id,
    }))
}

#[get("/minions/{minion_id}/pillars")]
pub async fn get_pillars(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let minion_id = path.into_inner();
    let response = run(&state, Command::new(Verb::Pillars).target(&minion_id)).await?;

    Ok(HttpResponse::Ok().json(PillarsData {
        pillars: for_minion(&response, &minion_id),
        minion_id,
    }))
}
