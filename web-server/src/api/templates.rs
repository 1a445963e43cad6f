// web-server/src/api/templates.rs
//! Saved job definitions. Public templates are visible to everyone, private
//! ones only to their creator; only the creator or an admin may change them.
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use common::models::{
    template::{JobTemplate, JobTemplateCreate, JobTemplateUpdate, TemplateOverrides, TemplateQuery},
    user::{Role, User},
};
use common::MessageResponse;
use serde_json::json;
use std::collections::BTreeSet;

use super::run_audited;
use crate::auth::{AdminOrOperator, Authorized, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::salt::{Command, Verb};
use crate::state::AppState;
use crate::store::audit::AuditEvent;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_categories)
        .service(list_templates)
        .service(create_template)
        .service(get_template)
        .service(update_template)
        .service(delete_template)
        .service(execute_template);
}

fn access_denied() -> ApiError {
    ApiError::Forbidden("Access denied".to_string())
}

fn find(state: &AppState, template_id: &str) -> ApiResult<JobTemplate> {
    state.templates.get(template_id).ok_or_else(|| ApiError::not_found("Template"))
}

fn visible(state: &AppState, template_id: &str, user: &User) -> ApiResult<JobTemplate> {
    let template = find(state, template_id)?;
    if template.visible_to(&user.username) {
        Ok(template)
    } else {
        Err(access_denied())
    }
}

fn owned(state: &AppState, template_id: &str, user: &User) -> ApiResult<JobTemplate> {
    let template = find(state, template_id)?;
    if template.created_by == user.username || user.role == Role::Administrator {
        Ok(template)
    } else {
        Err(access_denied())
    }
}

#[get("")]
pub async fn list_templates(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<TemplateQuery>,
) -> web::Json<Vec<JobTemplate>> {
    let templates = state
        .templates
        .list()
        .into_iter()
        .filter(|t| query.category.as_ref().map_or(true, |c| &t.category == c))
        .filter(|t| t.visible_to(&user.username))
        .collect();

    web::Json(templates)
}

#[post("")]
pub async fn create_template(
    state: web::Data<AppState>,
    user: Authorized<AdminOrOperator>,
    body: web::Json<JobTemplateCreate>,
) -> web::Json<JobTemplate> {
    let body = body.into_inner();
    let template = JobTemplate {
        id: state.templates.next_id(),
        name: body.name,
        description: body.description,
        target: body.target,
        function: body.function,
        args: body.args.unwrap_or_default(),
        kwargs: body.kwargs.unwrap_or_default(),
        category: body.category,
        is_public: body.is_public,
        created_by: user.username.clone(),
    };

    tracing::info!("{} created template {} ({})", user.username, template.id, template.name);
    state.templates.put(&template.id, template.clone());
    web::Json(template)
}

#[get("/{template_id}")]
pub async fn get_template(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<JobTemplate>> {
    Ok(web::Json(visible(&state, &path, &user)?))
}

#[put("/{template_id}")]
pub async fn update_template(
    state: web::Data<AppState>,
    user: Authorized<AdminOrOperator>,
    path: web::Path<String>,
    changes: web::Json<JobTemplateUpdate>,
) -> ApiResult<web::Json<JobTemplate>> {
    let mut template = owned(&state, &path, &user)?;
    template.apply(changes.into_inner());

    state.templates.put(&template.id, template.clone());
    Ok(web::Json(template))
}

#[delete("/{template_id}")]
pub async fn delete_template(
    state: web::Data<AppState>,
    user: Authorized<AdminOrOperator>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let template = owned(&state, &path, &user)?;
    state.templates.delete(&template.id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Template deleted successfully")))
}

/// Run the template's job, with any override taking precedence
#[post("/{template_id}/execute")]
pub async fn execute_template(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: Authorized<AdminOrOperator>,
    path: web::Path<String>,
    overrides: Option<web::Json<TemplateOverrides>>,
) -> ApiResult<HttpResponse> {
    let template = visible(&state, &path, &user)?;
    let overrides = overrides.map(web::Json::into_inner).unwrap_or_default();

    let target = overrides.target.unwrap_or_else(|| template.target.clone());
    let function = overrides.function.unwrap_or_else(|| template.function.clone());
    let args = overrides.args.unwrap_or_else(|| template.args.clone());
    let kwargs = overrides.kwargs.unwrap_or_else(|| template.kwargs.clone());

    let event = AuditEvent::new("template.execute", "template", template.id.clone())
        .detail("function", function.clone())
        .detail("target", target.clone());
    let command = Command::new(Verb::Execute)
        .target(target)
        .function(function)
        .args(args)
        .kwargs(kwargs);

    let job_result = run_audited(&state, &user, &req, event, command).await?;

    Ok(HttpResponse::Ok().json(json!({
        "template_id": template.id,
        "template_name": template.name,
        "job_result": job_result,
    })))
}

#[get("/categories/list")]
pub async fn list_categories(state: web::Data<AppState>, user: CurrentUser) -> web::Json<Vec<String>> {
    let categories: BTreeSet<String> = state
        .templates
        .list()
        .into_iter()
        .filter(|t| t.visible_to(&user.username))
        .map(|t| t.category)
        .collect();

    web::Json(categories.into_iter().collect())
}
