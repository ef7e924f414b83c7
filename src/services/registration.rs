//! Registration: ordered input rules, uniqueness pre-checks, then one store write.

use std::sync::Arc;
use tracing::{info, instrument};
use validator::ValidateEmail;

use crate::auth::Passwords;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, PublicUser};
use crate::repositories::UserRepository;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_USERNAME_LEN: usize = 3;

#[derive(Clone)]
pub struct RegistrationService {
    users: Arc<dyn UserRepository>,
    passwords: Passwords,
}

impl RegistrationService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Passwords) -> Self {
        Self { users, passwords }
    }

    /// Validate and create a user. Checks run in a fixed order and the first
    /// failure wins. The store's unique constraints still decide races that
    /// slip past the pre-checks.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<PublicUser> {
        validate_password(password)?;
        validate_username(username)?;
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("username taken".to_string()));
        }
        validate_email(email)?;
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("email taken".to_string()));
        }

        let password_hash = self.passwords.hash(password)?;
        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, "user registered");
        Ok(user.into())
    }
}

pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation("password too short".to_string()));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> AppResult<()> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AppError::Validation("username too short".to_string()));
    }
    if username.contains(' ') || !username.chars().all(char::is_alphanumeric) {
        return Err(AppError::Validation("invalid username format".to_string()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !email.validate_email() {
        return Err(AppError::Validation("invalid email".to_string()));
    }
    Ok(())
}
