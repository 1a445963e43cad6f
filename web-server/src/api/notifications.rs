// web-server/src/api/notifications.rs
use actix_web::{delete, get, post, put, web, HttpResponse};
use common::models::notification::{Notification, NotificationQuery, NotificationSettings};
use common::MessageResponse;
use serde_json::json;
use std::collections::HashSet;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_notifications)
        .service(mark_read)
        .service(mark_all_read)
        .service(unread_count)
        .service(get_settings)
        .service(update_settings)
        .service(delete_notification);
}

/// The caller's notifications, newest first
fn owned_by(state: &AppState, username: &str) -> Vec<Notification> {
    let mut owned: Vec<Notification> = state
        .notifications
        .list()
        .into_iter()
        .filter(|n| n.user == username)
        .collect();
    owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    owned
}

/// Flag the caller's notifications matching `select` as read, returning how
/// many changed
fn mark(state: &AppState, username: &str, select: impl Fn(&Notification) -> bool) -> usize {
    let mut count = 0;
    for mut notification in owned_by(state, username) {
        if notification.is_read || !select(&notification) {
            continue;
        }
        notification.is_read = true;
        let id = notification.id.clone();
        state.notifications.put(&id, notification);
        count += 1;
    }
    count
}

#[get("")]
pub async fn list_notifications(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<NotificationQuery>,
) -> web::Json<Vec<Notification>> {
    let mut notifications = owned_by(&state, &user.username);
    if query.unread_only {
        notifications.retain(|n| !n.is_read);
    }
    web::Json(notifications)
}

#[post("/mark-read")]
pub async fn mark_read(
    state: web::Data<AppState>,
    user: CurrentUser,
    ids: web::Json<Vec<String>>,
) -> web::Json<MessageResponse> {
    let ids: HashSet<String> = ids.into_inner().into_iter().collect();
    let count = mark(&state, &user.username, |n| ids.contains(&n.id));

    web::Json(MessageResponse::new(format!("Marked {} notifications as read", count)))
}

#[post("/mark-all-read")]
pub async fn mark_all_read(state: web::Data<AppState>, user: CurrentUser) -> web::Json<MessageResponse> {
    let count = mark(&state, &user.username, |_| true);
    web::Json(MessageResponse::new(format!("Marked {} notifications as read", count)))
}

#[delete("/{notification_id}")]
pub async fn delete_notification(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let owned = state
        .notifications
        .get(&path)
        .filter(|n| n.user == user.username)
        .ok_or_else(|| ApiError::not_found("Notification"))?;

    state.notifications.delete(&owned.id);
    Ok(web::Json(MessageResponse::new("Notification deleted")))
}

/// Stored settings, created from defaults on first read
#[get("/settings")]
pub async fn get_settings(state: web::Data<AppState>, user: CurrentUser) -> web::Json<NotificationSettings> {
    let settings = match state.notification_settings.get(&user.username) {
        Some(settings) => settings,
        None => {
            let defaults = NotificationSettings::defaults_for(&user.username, Some(user.email.clone()));
            state.notification_settings.put(&user.username, defaults.clone());
            defaults
        },
    };
    web::Json(settings)
}

#[put("/settings")]
pub async fn update_settings(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<NotificationSettings>,
) -> web::Json<NotificationSettings> {
    let mut settings = body.into_inner();
    settings.user = user.username.clone();

    state.notification_settings.put(&user.username, settings.clone());
    web::Json(settings)
}

#[get("/unread-count")]
pub async fn unread_count(state: web::Data<AppState>, user: CurrentUser) -> HttpResponse {
    let count = owned_by(&state, &user.username).iter().filter(|n| !n.is_read).count();
    HttpResponse::Ok().json(json!({ "count": count }))
}
