// web-server/src/auth/extractor.rs
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use common::models::user::User;
use futures_util::future::{ready, Ready};
use std::marker::PhantomData;
use std::ops::Deref;

use super::{require_role, AuthError, RolePolicy};
use crate::error::ApiError;
use crate::state::AppState;

/// Pull the token out of `Authorization: Bearer <token>`
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

fn authenticate(req: &HttpRequest) -> Result<User, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state not configured".to_string()))?;

    let token = bearer_token(req).ok_or(AuthError::Unauthenticated)?;
    Ok(state.auth.current_active_user(token)?)
}

/// Authenticated and active caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(CurrentUser))
    }
}

/// Authenticated, active caller whose role is in `P::ALLOWED`.
/// A handler taking `Authorized<AdminOnly>` never runs for anyone else.
pub struct Authorized<P: RolePolicy> {
    pub user: User,
    _policy: PhantomData<P>,
}

impl<P: RolePolicy> Authorized<P> {
    pub fn into_inner(self) -> User {
        self.user
    }
}

impl<P: RolePolicy> Deref for Authorized<P> {
    type Target = User;

    fn deref(&self) -> &User {
        &self.user
    }
}

impl<P: RolePolicy> FromRequest for Authorized<P> {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let outcome = authenticate(req).and_then(|user| {
            require_role(user, P::ALLOWED)
                .map(|user| Authorized { user, _policy: PhantomData })
                .map_err(ApiError::from)
        });
        ready(outcome)
    }
}
