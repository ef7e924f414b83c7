//! HTTP handlers: register, login, current user, token refresh and health.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::models::PublicUser;
use crate::services::{LoginSession, RegistrationService, SessionService};

/// Shared application state for the auth routes.
#[derive(Clone)]
pub struct AppState {
    pub registration: RegistrationService,
    pub session: SessionService,
}

impl AppState {
    pub fn registration(&self) -> &RegistrationService {
        &self.registration
    }
    pub fn session(&self) -> &SessionService {
        &self.session
    }
}

type BearerHeader = Option<TypedHeader<Authorization<Bearer>>>;

fn bearer_token(header: &BearerHeader) -> Option<&str> {
    header.as_ref().map(|TypedHeader(auth)| auth.token())
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Missing or non-string fields fall back to empty strings, which simply
/// fail the lookup.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub password: String,
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: LoginSession,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(body) = body?;
    let user = state
        .registration()
        .register(&body.username, &body.email, &body.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user created".to_string(),
            user,
        }),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(body) = body?;
    let user = state.session().login(&body.email, &body.password).await?;
    Ok(Json(LoginResponse { user }))
}

/// GET /auth/me — requires a Bearer access token.
pub async fn me(
    State(state): State<AppState>,
    auth: BearerHeader,
) -> Result<Json<PublicUser>, AppError> {
    let user = state.session().whoami(bearer_token(&auth)).await?;
    Ok(Json(user))
}

/// POST /auth/token/refresh — requires a Bearer refresh token.
/// Responds with `access_token`; the value is a freshly minted access token.
pub async fn refresh_token(
    State(state): State<AppState>,
    auth: BearerHeader,
) -> Result<Json<RefreshResponse>, AppError> {
    let access_token = state.session().refresh(bearer_token(&auth))?;
    Ok(Json(RefreshResponse { access_token }))
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "authgate" })),
    )
}
