// web-server/src/api/schedules.rs
use actix_web::{delete, get, post, web, HttpResponse};
use common::models::salt::ScheduleRequest;
use common::Envelope;

use super::run;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_schedules).service(add_schedule).service(delete_schedule);
}

#[get("/schedules/{target}")]
pub async fn list_schedules(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::ListSchedules).target(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[post("/schedules")]
pub async fn add_schedule(
    state: web::Data<AppState>,
    _user: CurrentUser,
    body: web::Json<ScheduleRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let message = format!("Schedule '{}' added to {}", body.name, body.target);

    // schedule.add <name> function=<fun> <timing fields...>
    let command = Command::new(Verb::AddSchedule)
        .target(body.target)
        .arg(body.name)
        .kwarg("function", body.function)
        .kwargs(body.schedule);

    let data = run(&state, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}

#[delete("/schedules/{target}/{name}")]
pub async fn delete_schedule(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (target, name) = path.into_inner();
    let message = format!("Schedule '{}' deleted from {}", name, target);

    let data = run(&state, Command::new(Verb::DeleteSchedule).target(target).arg(name)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with_message(message)))
}
