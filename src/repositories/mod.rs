//! User store seam: the trait the services depend on, plus the in-memory store.

mod memory_repo;

pub use memory_repo::InMemoryUserRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{NewUser, User};

/// Persistent user store. Implementations enforce username and email
/// uniqueness in `create` and report a violation as `AppError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;
}
