// web-server/src/error.rs
use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError, UrlencodedError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse, ResponseError,
};
use common::ErrorBody;
use thiserror::Error;

use crate::auth::AuthError;
use crate::salt::UpstreamError;

/// Seconds a throttled client is told to wait
pub const RETRY_AFTER_SECS: u64 = 60;

/// Every failure a handler can surface, mapped to a status and `{detail}` body
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());

        match self {
            ApiError::Unauthorized(_) => {
                response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
            },
            ApiError::RateLimited => {
                response.insert_header((header::RETRY_AFTER, RETRY_AFTER_SECS.to_string()));
            },
            ApiError::Upstream(e) => {
                tracing::error!("Upstream call failed: {}", e);
            },
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
            },
            _ => {}
        }

        response.json(ErrorBody {
            detail: self.to_string(),
        })
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Forbidden => ApiError::Forbidden(e.to_string()),
            AuthError::Hashing(msg) | AuthError::Token(msg) => ApiError::Internal(msg),
            AuthError::BadCredentials
            | AuthError::InvalidOrExpired
            | AuthError::Unauthenticated
            | AuthError::Inactive => ApiError::Unauthorized(e.to_string()),
        }
    }
}

// Extractor failures (malformed body, query, form or path) surface as 422

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

pub fn form_error_handler(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("Minion").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::Upstream(UpstreamError::Status { status: 502, body: "bad gateway".into() }).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_map_to_401_or_403() {
        for e in [AuthError::BadCredentials, AuthError::InvalidOrExpired, AuthError::Unauthenticated, AuthError::Inactive] {
            assert_eq!(ApiError::from(e).status_code(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(ApiError::from(AuthError::Forbidden).status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_upstream_message_is_detail() {
        let err = ApiError::from(UpstreamError::Status { status: 500, body: "Key not found".into() });
        assert!(err.to_string().contains("Key not found"));
    }
}
