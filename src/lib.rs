//! User registration and JWT authentication service.
//!
//! Registers users with ordered validation rules, authenticates them by
//! email and password, and issues short-lived access tokens plus longer-lived
//! refresh tokens. Storage sits behind the [`repositories::UserRepository`]
//! trait with Postgres and in-memory implementations.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;
pub use services::{RegistrationService, SessionService};

use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use auth::{Passwords, TokenIssuer};
use handlers::http;
use repositories::UserRepository;

/// Wire services over a user store using the loaded configuration.
pub fn build_state(config: &Config, users: Arc<dyn UserRepository>) -> Result<AppState, AppError> {
    let passwords = Passwords::new(
        config.argon2_memory_kib,
        config.argon2_iterations,
        config.argon2_parallelism,
    )?;
    let tokens = TokenIssuer::new(
        config.jwt_secret.clone(),
        chrono::Duration::seconds(config.access_token_ttl_secs),
        chrono::Duration::seconds(config.refresh_token_ttl_secs),
    );

    Ok(AppState {
        registration: RegistrationService::new(users.clone(), passwords.clone()),
        session: SessionService::new(users, passwords, tokens),
    })
}

/// Build the API router (auth, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let auth_routes = axum::Router::new()
        .route("/register", post(http::register))
        .route("/login", post(http::login))
        .route("/me", get(http::me))
        .route("/token/refresh", post(http::refresh_token));

    axum::Router::new()
        .route("/health", get(http::health))
        .nest("/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
