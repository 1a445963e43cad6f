// web-server/src/api/auth.rs
use actix_web::{delete, get, post, put, web, Either, HttpRequest, HttpResponse};
use common::models::{
    audit::AuditResult,
    user::{LoginForm, TokenResponse, User, UserCreate, UserUpdate},
};
use common::MessageResponse;
use serde_json::json;

use super::client_ip;
use crate::auth::{AdminOnly, Authorized, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::audit::AuditEvent;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(token)
        .service(login)
        .service(me)
        .service(logout)
        .service(list_users)
        .service(create_user)
        .service(update_user)
        .service(delete_user);
}

/// bcrypt is CPU bound; keep it off the async workers
async fn blocking<F, T>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

async fn issue_token(state: web::Data<AppState>, credentials: LoginForm) -> ApiResult<HttpResponse> {
    let auth = state.auth.clone();
    let access_token =
        blocking(move || Ok(auth.login(&credentials.username, &credentials.password)?)).await?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}

/// OAuth2 password grant; a JSON body is accepted as well
#[post("/token")]
pub async fn token(
    state: web::Data<AppState>,
    form: Either<web::Form<LoginForm>, web::Json<LoginForm>>,
) -> ApiResult<HttpResponse> {
    let credentials = match form {
        Either::Left(form) => form.into_inner(),
        Either::Right(json) => json.into_inner(),
    };
    issue_token(state, credentials).await
}

#[post("/login")]
pub async fn login(state: web::Data<AppState>, credentials: web::Json<LoginForm>) -> ApiResult<HttpResponse> {
    issue_token(state, credentials.into_inner()).await
}

#[get("/me")]
pub async fn me(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(user.into_inner())
}

/// Tokens are stateless, so this only acknowledges; the client drops the token
#[post("/logout")]
pub async fn logout(user: CurrentUser) -> HttpResponse {
    tracing::info!("User {} logged out", user.username);
    HttpResponse::Ok().json(json!({
        "message": "Successfully logged out",
        "user": user.username,
        "note": "Token remains valid until expiry. Discard it on the client."
    }))
}

#[get("/users")]
pub async fn list_users(state: web::Data<AppState>, _admin: Authorized<AdminOnly>) -> web::Json<Vec<User>> {
    web::Json(state.auth.users().list())
}

#[post("/users")]
pub async fn create_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: Authorized<AdminOnly>,
    new_user: web::Json<UserCreate>,
) -> ApiResult<HttpResponse> {
    let users = state.auth.users().clone();
    let user = blocking(move || users.create(new_user.into_inner())).await?;

    state.audit.record(
        &admin.username,
        AuditEvent::new("user.create", "user", user.id.clone())
            .detail("username", user.username.clone())
            .detail("role", user.role.as_str()),
        AuditResult::Success,
        client_ip(&state, &req),
    );

    Ok(HttpResponse::Ok().json(user))
}

#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    _admin: Authorized<AdminOnly>,
    path: web::Path<String>,
    changes: web::Json<UserUpdate>,
) -> ApiResult<HttpResponse> {
    let users = state.auth.users().clone();
    let user_id = path.into_inner();
    let user = blocking(move || users.update(&user_id, changes.into_inner())).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[delete("/users/{user_id}")]
pub async fn delete_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    admin: Authorized<AdminOnly>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner();
    let deleted = state.auth.users().delete(&user_id, &admin)?;

    state.audit.record(
        &admin.username,
        AuditEvent::new("user.delete", "user", user_id).detail("username", deleted.username),
        AuditResult::Success,
        client_ip(&state, &req),
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}
