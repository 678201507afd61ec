//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO; empty = AWS).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Public base URL used to build object URLs (empty = virtual-hosted AWS URL).
    #[serde(default)]
    pub public_base_url: String,
    /// Presigned URL expiry in seconds.
    #[serde(default = "default_presign_expiry")]
    pub presign_expiry_seconds: u64,
    /// Maximum number of presigned URLs per request.
    #[serde(default = "default_max_keys")]
    pub max_keys_per_request: usize,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket() -> String {
    "scribe-uploads".to_string()
}

fn default_presign_expiry() -> u64 {
    900
}

fn default_max_keys() -> usize {
    10
}
