//! Session management.

pub mod service;

pub use service::SessionService;
