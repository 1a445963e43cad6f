// web-server/src/api/fileserver.rs
use actix_web::{get, web, HttpResponse};
use common::models::salt::{FileContentQuery, FileListQuery};
use common::Envelope;

use super::run;
use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::salt::{Command, Verb};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_files).service(file_roots).service(file_content);
}

#[get("/fileserver/files")]
pub async fn list_files(
    state: web::Data<AppState>,
    _user: CurrentUser,
    query: web::Query<FileListQuery>,
) -> ApiResult<HttpResponse> {
    let environment = query.into_inner().environment;
    let data = run(&state, Command::new(Verb::ListFiles).kwarg("saltenv", environment.as_str())).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with("environment", environment)))
}

#[get("/fileserver/roots")]
pub async fn file_roots(state: web::Data<AppState>, _user: CurrentUser) -> ApiResult<HttpResponse> {
    let data = run(&state, Command::new(Verb::FileRoots)).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[get("/fileserver/file")]
pub async fn file_content(
    state: web::Data<AppState>,
    _user: CurrentUser,
    query: web::Query<FileContentQuery>,
) -> ApiResult<HttpResponse> {
    let FileContentQuery { path, environment } = query.into_inner();
    let command = Command::new(Verb::FileContent)
        .kwarg("path", path.as_str())
        .kwarg("saltenv", environment);

    let data = run(&state, command).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(data).with("path", path)))
}
