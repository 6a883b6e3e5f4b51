//! S3-backed [`ObjectStore`] implementation.
//!
//! Works against AWS S3 or any S3-compatible store (MinIO, R2) via the
//! optional `S3_ENDPOINT_URL` / `S3_FORCE_PATH_STYLE` settings.

use aws_sdk_s3::primitives::ByteStream;

use crate::{ObjectStore, StorageError};

/// Configuration for [`S3ObjectStore`], loaded from environment variables.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket all blobs are written to.
    pub bucket: String,
    /// Region (default: `us-east-1`).
    pub region: String,
    /// Optional custom endpoint for S3-compatible stores.
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (required by most self-hosted stores).
    pub force_path_style: bool,
}

impl S3Config {
    /// Load S3 configuration from environment variables.
    ///
    /// | Env Var               | Required | Default     |
    /// |-----------------------|----------|-------------|
    /// | `S3_BUCKET`           | **yes**  | --          |
    /// | `S3_REGION`           | no       | `us-east-1` |
    /// | `S3_ENDPOINT_URL`     | no       | --          |
    /// | `S3_FORCE_PATH_STYLE` | no       | `false`     |
    ///
    /// Credentials come from the standard AWS provider chain.
    ///
    /// # Panics
    ///
    /// Panics if `S3_BUCKET` is not set.
    pub fn from_env() -> Self {
        let bucket = std::env::var("S3_BUCKET").expect("S3_BUCKET must be set");
        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into());
        let endpoint_url = std::env::var("S3_ENDPOINT_URL").ok();
        let force_path_style = std::env::var("S3_FORCE_PATH_STYLE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            bucket,
            region,
            endpoint_url,
            force_path_style,
        }
    }

    /// Public URL for the blob stored under `key`.
    ///
    /// Virtual-hosted style against AWS; `<endpoint>/<bucket>/<key>` when
    /// an endpoint override is set.
    pub fn object_url(&self, key: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => {
                let endpoint = endpoint.trim_end_matches('/');
                format!("{endpoint}/{}/{key}", self.bucket)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{key}",
                self.bucket, self.region
            ),
        }
    }
}

/// [`ObjectStore`] backed by the AWS S3 SDK.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    config: S3Config,
}

impl S3ObjectStore {
    /// Build a client from the AWS provider chain plus our [`S3Config`].
    pub async fn connect(config: S3Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            config,
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                source: Box::new(e),
            })?;

        tracing::debug!(key, size, "Uploaded object");
        Ok(())
    }

    fn url(&self, key: &str) -> String {
        self.config.object_url(key)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                source: Box::new(e),
            })?;

        tracing::debug!(key, "Deleted object");
        Ok(())
    }
}
