//! # scribe-api
//!
//! HTTP API layer for Scribe built on Axum.
//!
//! Provides all REST endpoints, extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::{build_app, build_state};
pub use state::AppState;
