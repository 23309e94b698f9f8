//! S3-compatible object storage for flight documents.
//!
//! Wraps `aws-sdk-s3` to provide upload, presigned download URLs and
//! deletion. Works against AWS S3 and MinIO alike.

use anyhow::{Context, Result};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::{
    config::{Builder as S3Builder, Credentials, Region},
    primitives::ByteStream,
    Client,
};
use skyferry_common::config::StorageConfig;
use std::time::Duration;

/// Object storage client.
#[derive(Clone)]
pub struct StorageClient {
    inner: Client,
    bucket: String,
}

impl StorageClient {
    /// Build a client from config. No network traffic happens here.
    pub fn new(cfg: &StorageConfig) -> Self {
        let creds = Credentials::new(
            &cfg.access_key,
            &cfg.secret_key,
            None, // session token
            None, // expiry
            "skyferry-storage",
        );

        let s3_cfg = S3Builder::new()
            .endpoint_url(&cfg.endpoint)
            .credentials_provider(creds)
            .region(Region::new(cfg.region.clone()))
            // Path-style URLs are required by MinIO
            .force_path_style(true)
            .build();

        Self {
            inner: Client::from_conf(s3_cfg),
            bucket: cfg.bucket.clone(),
        }
    }

    /// Upload bytes to the given key.
    pub async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.inner
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .with_context(|| format!("Failed to upload {key} to object storage"))?;

        Ok(())
    }

    /// Generate a presigned GET URL valid for `expiry_secs` seconds.
    ///
    /// Every download link is signed; objects are never linked permanently.
    pub async fn presigned_get_url(&self, key: &str, expiry_secs: u64) -> Result<String> {
        let presigning_cfg = PresigningConfig::expires_in(Duration::from_secs(expiry_secs))
            .context("Failed to build presigning config")?;

        let req = self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_cfg)
            .await
            .with_context(|| format!("Failed to create presigned URL for {key}"))?;

        Ok(req.uri().to_string())
    }

    /// Delete an object by its storage key.
    pub async fn delete_object(&self, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("Failed to delete {key} from object storage"))?;

        Ok(())
    }

    /// Delete several objects, logging failures instead of aborting.
    ///
    /// Returns how many deletions failed. Used after the owning rows are gone,
    /// where an orphaned object is preferable to failing the request.
    pub async fn delete_objects_best_effort(&self, keys: &[String]) -> usize {
        let mut failed = 0;
        for key in keys {
            if let Err(e) = self.delete_object(key).await {
                tracing::warn!(key = %key, error = %format!("{e:#}"), "Orphaned document object");
                failed += 1;
            }
        }
        failed
    }

    /// Ensure the bucket exists; create it if absent.
    pub async fn ensure_bucket(&self) -> Result<()> {
        match self.inner.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                tracing::debug!(bucket = %self.bucket, "Bucket already exists");
                Ok(())
            }
            Err(_) => {
                tracing::info!(bucket = %self.bucket, "Bucket does not exist, creating");
                self.inner
                    .create_bucket()
                    .bucket(&self.bucket)
                    .send()
                    .await
                    .context("Failed to create object storage bucket")?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StorageConfig {
        StorageConfig {
            endpoint: "http://localhost:9000".into(),
            bucket: "docs".into(),
            access_key: "minio".into(),
            secret_key: "minio123".into(),
            region: "us-east-1".into(),
            signed_url_ttl_secs: 60,
        }
    }

    #[tokio::test]
    async fn presigned_url_points_at_bucket_and_key() {
        let client = StorageClient::new(&config());
        let url = client.presigned_get_url("flights/x/y.pdf", 300).await.unwrap();
        assert!(url.starts_with("http://localhost:9000/docs/flights/x/y.pdf?"));
        assert!(url.contains("X-Amz-Expires=300"));
    }

    #[tokio::test]
    async fn download_links_are_always_signed() {
        let client = StorageClient::new(&config());
        let url = client.presigned_get_url("flights/x/registration.pdf", 60).await.unwrap();
        assert!(url.contains("X-Amz-Signature="));
        assert!(url.contains("X-Amz-Credential=minio"));
        assert!(url.contains("X-Amz-Expires=60"));
    }
}
