use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::auth::token::{self, Claims, TokenWindows};

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub windows: TokenWindows,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(
            repo,
            AuthConfig { jwt_secret: Some(self.auth.jwt_secret.clone()), windows: self.auth.windows },
        )
    }
}

// RegisterInput and LoginInput are provided by service::auth::domain

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user_type: String,
    pub username: String,
}

#[derive(Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub user_type: String,
    pub ref_id: Option<String>,
}

#[utoipa::path(post, path = "/api/v1/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<RegisterOutput>), JsonApiError> {
    let svc = state.auth_service();
    let user = svc.register(input).await?;
    Ok((StatusCode::CREATED, Json(RegisterOutput { user_id: user.id, username: user.username })))
}

#[utoipa::path(post, path = "/api/v1/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>, JsonApiError> {
    let svc = state.auth_service();
    let session = svc.login(input).await?;
    match (session.access_token, session.refresh_token) {
        (Some(access), Some(refresh)) => Ok(Json(LoginOutput {
            access_token: access,
            refresh_token: refresh,
            token_type: "bearer",
            user_type: session.user.user_type,
            username: session.user.username,
        })),
        _ => Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some("token generation failed".into()))),
    }
}

#[utoipa::path(post, path = "/api/v1/auth/refresh", tag = "auth", request_body = crate::openapi::RefreshRequest, responses((status = 200, description = "Refreshed"), (status = 401, description = "Unauthorized")))]
pub async fn refresh(
    State(state): State<ServerState>,
    Json(input): Json<RefreshInput>,
) -> Result<Json<LoginOutput>, JsonApiError> {
    let svc = state.auth_service();
    let session = svc.refresh(&input.refresh_token).await?;
    match (session.access_token, session.refresh_token) {
        (Some(access), Some(refresh)) => Ok(Json(LoginOutput {
            access_token: access,
            refresh_token: refresh,
            token_type: "bearer",
            user_type: session.user.user_type,
            username: session.user.username,
        })),
        _ => Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some("token generation failed".into()))),
    }
}

#[utoipa::path(get, path = "/api/v1/auth/me", tag = "auth", responses((status = 200, description = "OK"), (status = 401, description = "Unauthorized")))]
pub async fn me(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MeOutput>, JsonApiError> {
    let svc = state.auth_service();
    let user = svc.current_user(&claims.sub).await?;
    Ok(Json(MeOutput {
        user_id: user.id,
        username: user.username,
        email: user.email,
        user_type: user.user_type,
        ref_id: user.ref_id,
    }))
}

/// Static role check against the verified claims.
pub fn require_role(claims: &Claims, allowed: &[&str]) -> Result<(), JsonApiError> {
    if allowed.contains(&claims.role.as_str()) {
        Ok(())
    } else {
        warn!(role = %claims.role, ?allowed, "role check failed");
        Err(JsonApiError::forbidden())
    }
}

/// Global middleware: every route except health, login/register/refresh,
/// docs and CORS preflight requires `Authorization: Bearer <access token>`.
/// Verified claims are injected into request extensions for the handlers.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path();
    let method = req.method().clone();

    // Whitelist: health check, auth entry points, docs, CORS preflight
    if path == "/health"
        || path == "/api/v1/auth/login"
        || path == "/api/v1/auth/register"
        || path == "/api/v1/auth/refresh"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == axum::http::Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    let authz = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match authz {
        Some(h) => {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(JsonApiError::unauthorized("expected Bearer token"));
            }
            h[prefix.len()..].to_string()
        }
        None => {
            warn!(path = %path, "missing Authorization header");
            return Err(JsonApiError::unauthorized("missing Authorization header"));
        }
    };

    match token::decode_token(&state.auth.jwt_secret, &token) {
        Ok(claims) if claims.is_access() => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Ok(_) => {
            warn!(path = %path, "refresh token presented as access token");
            Err(JsonApiError::unauthorized("not an access token"))
        }
        Err(e) => {
            warn!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("invalid or expired token"))
        }
    }
}
