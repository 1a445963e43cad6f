// web-server/src/api/cloud.rs
use actix_web::{get, post, web, HttpResponse};
use common::models::salt::{CloudInstanceRequest, CloudProfileQuery};
use common::Envelope;

use super::run;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_providers).service(list_profiles).service(create_instances);
}

#[get("/cloud/providers")]
pub async fn list_providers(state: web::Data<AppState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::CloudProviders)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[get("/cloud/profiles")]
pub async fn list_profiles(
    state: web::Data<AppState>,
    _user: CurrentUser,
    query: web::Query<CloudProfileQuery>,
) -> ApiResult<HttpResponse> {
    let mut command = Command::new(Verb::CloudProfiles);
    if let Some(provider) = query.into_inner().provider {
        command = command.kwarg("provider", provider);
    }

    let data = run(&state, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[post("/cloud/instances")]
pub async fn create_instances(
    state: web::Data<AppState>,
    _user: CurrentUser,
    body: web::Json<CloudInstanceRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    if body.names.is_empty() {
        return Err(ApiError::Validation("names must not be empty".to_string()));
    }
    let message = format!("Creating instances: {}", body.names.join(", "));

    let command = Command::new(Verb::CloudCreate)
        .kwarg("prof", body.profile)
        .kwarg("instances", body.names);

    let data = run(&state, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}
