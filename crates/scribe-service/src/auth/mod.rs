//! Authentication flows.

pub mod service;

pub use service::{AuthService, AuthTokens, LoginOutcome, RegisterRequest};
