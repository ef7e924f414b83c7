//! Authentication primitives: password hashing and JWT access/refresh tokens.

mod jwt;
mod service;

pub use jwt::{TokenError, TokenIssuer, TokenKind};
pub use service::Passwords;
