use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// JSON error body: `{"error": ..., "detail": ...}`
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), detail }
    }

    pub fn unauthorized(detail: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.to_string()))
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Not Authorized", None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.error, detail = ?self.detail, "request failed");
        }
        let body = serde_json::json!({"error": self.error, "detail": self.detail});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match &e {
            ServiceError::Validation(_) | ServiceError::Model(_) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()))
            }
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            ServiceError::Conflict(_) => Self::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            ServiceError::Forbidden(_) => Self::new(StatusCode::FORBIDDEN, "Not Authorized", Some(e.to_string())),
            ServiceError::Db(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some(e.to_string())),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match &e {
            AuthError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            AuthError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            AuthError::Unauthorized | AuthError::TokenError(_) => {
                Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(e.to_string()))
            }
            AuthError::Inactive => Self::new(StatusCode::BAD_REQUEST, "Inactive User", Some(e.to_string())),
            AuthError::HashError(_) | AuthError::Repository(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some(e.to_string()))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_http_codes() {
        let v: JsonApiError = ServiceError::Validation("x".into()).into();
        assert_eq!(v.status, StatusCode::BAD_REQUEST);
        let n: JsonApiError = ServiceError::not_found("kurikulum").into();
        assert_eq!(n.status, StatusCode::NOT_FOUND);
        let c: JsonApiError = ServiceError::Conflict("dup".into()).into();
        assert_eq!(c.status, StatusCode::CONFLICT);
        let d: JsonApiError = ServiceError::Db("boom".into()).into();
        assert_eq!(d.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map_to_http_codes() {
        let u: JsonApiError = AuthError::Unauthorized.into();
        assert_eq!(u.status, StatusCode::UNAUTHORIZED);
        let t: JsonApiError = AuthError::TokenError("expired".into()).into();
        assert_eq!(t.status, StatusCode::UNAUTHORIZED);
        let c: JsonApiError = AuthError::Conflict.into();
        assert_eq!(c.status, StatusCode::CONFLICT);
    }
}
