//! Presigned-upload generation against S3-compatible storage.

use std::time::Duration;

use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use scribe_core::config::storage::StorageConfig;
use scribe_core::error::AppError;
use scribe_core::result::AppResult;

/// One generated upload slot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    /// The object key the client must upload to.
    pub key: String,
    /// The presigned PUT URL.
    pub presigned_url: String,
    /// The public URL the object will be reachable at after upload.
    pub public_url: String,
}

/// Generates presigned PUT URLs for direct client uploads.
#[derive(Debug, Clone)]
pub struct PresignService {
    client: Client,
    bucket: String,
    region: String,
    public_base_url: String,
    presign_expiry: Duration,
    max_keys_per_request: usize,
}

impl PresignService {
    /// Build the service from configuration, resolving AWS credentials
    /// from the environment.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(&config.endpoint);
        }
        let sdk_config = loader.load().await;

        info!(
            bucket = %config.bucket,
            region = %config.region,
            "PresignService initialized"
        );

        Ok(Self {
            client: Client::new(&sdk_config),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            presign_expiry: Duration::from_secs(config.presign_expiry_seconds),
            max_keys_per_request: config.max_keys_per_request,
        })
    }

    /// Generate `key_count` upload slots under `folder` for objects of the
    /// given MIME type. Replaced keys, when provided, are deleted on a
    /// best-effort basis first.
    pub async fn generate_upload_urls(
        &self,
        content_type: &str,
        folder: &str,
        key_count: usize,
        old_keys: &[String],
    ) -> AppResult<Vec<PresignedUpload>> {
        if key_count == 0 || key_count > self.max_keys_per_request {
            return Err(AppError::validation(format!(
                "keyCount must be between 1 and {}",
                self.max_keys_per_request
            )));
        }

        if !old_keys.is_empty() {
            self.delete_objects(old_keys).await;
        }

        let mut uploads = Vec::with_capacity(key_count);
        for _ in 0..key_count {
            let key = generate_key(folder, content_type);
            let presigned_url = self.presign_put(&key, content_type).await?;
            let public_url = self.public_url(&key);
            uploads.push(PresignedUpload {
                key,
                presigned_url,
                public_url,
            });
        }

        info!(count = key_count, folder, "Generated presigned upload URLs");
        Ok(uploads)
    }

    /// Delete objects, logging and swallowing individual failures.
    pub async fn delete_objects(&self, keys: &[String]) {
        for key in keys {
            let result = self
                .client
                .delete_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await;
            match result {
                Ok(_) => info!(key, "Deleted object"),
                Err(e) => warn!(key, error = %e, "Failed to delete object"),
            }
        }
    }

    /// Check whether an object exists.
    pub async fn object_exists(&self, key: &str) -> bool {
        self.client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .is_ok()
    }

    /// The public URL an uploaded object is served from.
    pub fn public_url(&self, key: &str) -> String {
        if self.public_base_url.is_empty() {
            format!(
                "https://{}.s3.{}.amazonaws.com/{key}",
                self.bucket, self.region
            )
        } else {
            format!("{}/{key}", self.public_base_url)
        }
    }

    async fn presign_put(&self, key: &str, content_type: &str) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(self.presign_expiry)
            .map_err(|e| AppError::storage(format!("Invalid presign expiry: {e}")))?;
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::storage(format!("Failed to presign upload: {e}")))?;
        Ok(request.uri().to_string())
    }
}

/// Build a collision-resistant object key: `{folder}/{timestamp}-{uuid8}{ext}`.
fn generate_key(folder: &str, content_type: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let uuid = Uuid::new_v4().simple().to_string();
    let short = &uuid[..8];
    let extension = extension_for(content_type);
    format!("{folder}/{timestamp}-{short}{extension}")
}

/// Map a MIME type to a file extension, defaulting to `.bin`.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/png" => ".png",
        "image/webp" => ".webp",
        "image/gif" => ".gif",
        "application/pdf" => ".pdf",
        "text/plain" => ".txt",
        _ => ".bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping() {
        assert_eq!(extension_for("image/jpeg"), ".jpg");
        assert_eq!(extension_for("image/png"), ".png");
        assert_eq!(extension_for("application/octet-stream"), ".bin");
    }

    #[test]
    fn generated_keys_carry_folder_and_extension() {
        let key = generate_key("avatars", "image/png");
        assert!(key.starts_with("avatars/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn generated_keys_are_unique() {
        assert_ne!(
            generate_key("posts", "image/jpeg"),
            generate_key("posts", "image/jpeg")
        );
    }
}
