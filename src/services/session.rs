//! Login, current-user introspection and access-token refresh.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::{Passwords, TokenIssuer, TokenKind};
use crate::error::{AppError, AppResult};
use crate::models::PublicUser;
use crate::repositories::UserRepository;

const INVALID_CREDENTIALS: &str = "invalid credentials";
const UNAUTHENTICATED: &str = "unauthenticated";
const INVALID_REFRESH_TOKEN: &str = "invalid refresh token";

/// Tokens and profile fields returned by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub access: String,
    pub refresh: String,
    pub username: String,
    pub email: String,
}

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserRepository>,
    passwords: Passwords,
    tokens: TokenIssuer,
}

impl SessionService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Passwords, tokens: TokenIssuer) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Unknown email and wrong password produce the same error.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginSession> {
        let Some(user) = self.users.find_by_email(email).await? else {
            self.passwords.verify_decoy(password)?;
            debug!("login rejected: unknown email");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        };
        if !self.passwords.verify(&user.password_hash, password)? {
            debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let access = self.issue(user.id, TokenKind::Access)?;
        let refresh = self.issue(user.id, TokenKind::Refresh)?;
        info!(user_id = %user.id, "user logged in");
        Ok(LoginSession {
            access,
            refresh,
            username: user.username,
            email: user.email,
        })
    }

    /// Resolve an access token to the user it was issued for. A valid token
    /// whose user no longer exists is treated as unauthenticated.
    pub async fn whoami(&self, access_token: Option<&str>) -> AppResult<PublicUser> {
        let token = access_token.ok_or_else(|| AppError::Auth(UNAUTHENTICATED.to_string()))?;
        let user_id = self
            .tokens
            .verify(token, TokenKind::Access)
            .map_err(|e| {
                debug!(error = %e, "access token rejected");
                AppError::Auth(UNAUTHENTICATED.to_string())
            })?;
        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            debug!(user_id = %user_id, "access token for missing user");
            AppError::Auth(UNAUTHENTICATED.to_string())
        })?;
        Ok(user.into())
    }

    /// Mint a new access token from a refresh token. Access tokens are
    /// refused. The user record is not re-read.
    pub fn refresh(&self, refresh_token: Option<&str>) -> AppResult<String> {
        let token =
            refresh_token.ok_or_else(|| AppError::Auth(INVALID_REFRESH_TOKEN.to_string()))?;
        let user_id = self
            .tokens
            .verify(token, TokenKind::Refresh)
            .map_err(|e| {
                debug!(error = %e, "refresh token rejected");
                AppError::Auth(INVALID_REFRESH_TOKEN.to_string())
            })?;
        let access = self.issue(user_id, TokenKind::Access)?;
        debug!(user_id = %user_id, "access token refreshed");
        Ok(access)
    }

    fn issue(&self, user_id: uuid::Uuid, kind: TokenKind) -> AppResult<String> {
        self.tokens
            .issue(user_id, kind)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("issue {} token: {}", kind, e)))
    }
}
