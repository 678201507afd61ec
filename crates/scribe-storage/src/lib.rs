//! # scribe-storage
//!
//! Object-storage integration for Scribe: presigned PUT URLs for direct
//! browser uploads, best-effort cleanup of replaced objects, and public
//! URL construction.

pub mod presign;

pub use presign::{PresignService, PresignedUpload};
