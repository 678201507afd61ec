//! # scribe-auth
//!
//! Credential handling for Scribe: Argon2id password hashing and policy
//! checks, JWT access-token issuance and validation, and opaque refresh
//! token generation. Session persistence lives in `scribe-database`;
//! orchestration lives in `scribe-service`.

pub mod jwt;
pub mod password;
pub mod token;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use token::{generate_refresh_token, generate_reset_token};
