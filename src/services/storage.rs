//! Payload storage.
//!
//! Uploaded analysis payloads live in an S3 bucket (MinIO in development).
//! The routes only read them back, either streamed through the server or
//! through a presigned download link.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::S3Config;
use crate::error::{AppError, AppResult};

/// A payload object together with the headers it was stored with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredPayload {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
}

/// Read access to stored payloads.
#[async_trait]
pub trait PayloadStorage: Send + Sync {
    /// Fetch the object stored under `key`, `None` if there is none.
    async fn fetch(&self, key: &str) -> AppResult<Option<StoredPayload>>;

    /// A time-limited URL downloading `key` as `filename`.
    async fn download_link(&self, key: &str, filename: &str) -> AppResult<String>;
}

/// `Content-Disposition` value downloading a payload as `filename`.
pub fn attachment_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}

/// S3 storage client wrapper.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    link_expiry: Duration,
}

impl S3Storage {
    /// Create a new S3 storage client from configuration.
    pub fn new(config: &S3Config, link_expiry_secs: u64) -> Self {
        let credentials =
            Credentials::new(&config.access_key, &config.secret_key, None, None, "xavier");

        let region = Region::new(config.region.clone());

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .force_path_style(true); // Required for MinIO

        if let Some(ref endpoint) = config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!(
            "S3 payload storage initialized: bucket={}, link expiry={}s",
            config.bucket, link_expiry_secs
        );

        Self {
            client,
            bucket: config.bucket.clone(),
            link_expiry: Duration::from_secs(link_expiry_secs),
        }
    }
}

#[async_trait]
impl PayloadStorage for S3Storage {
    async fn fetch(&self, key: &str) -> AppResult<Option<StoredPayload>> {
        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    debug!("Payload '{}' not found in bucket '{}'", key, self.bucket);
                    return Ok(None);
                }
                return Err(AppError::Storage(format!(
                    "Failed to get payload from S3: {}",
                    service_error
                )));
            }
        };

        let content_type = response.content_type().map(String::from);
        let content_disposition = response.content_disposition().map(String::from);
        let data = response
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read S3 response body: {}", e)))?
            .into_bytes()
            .to_vec();

        Ok(Some(StoredPayload {
            data,
            content_type,
            content_disposition,
        }))
    }

    async fn download_link(&self, key: &str, filename: &str) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(self.link_expiry)
            .map_err(|e| AppError::Storage(format!("Invalid link expiry: {}", e)))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition(attachment_disposition(filename))
            .presigned(presigning)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to presign payload link: {}", e)))?;

        Ok(request.uri().to_string())
    }
}

/// Payload storage kept in process memory.
pub struct InMemoryStorage {
    base_url: String,
    objects: RwLock<HashMap<String, StoredPayload>>,
}

impl InMemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, key: &str, payload: StoredPayload) {
        self.objects.write().await.insert(key.to_string(), payload);
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new("http://localhost/payloads")
    }
}

#[async_trait]
impl PayloadStorage for InMemoryStorage {
    async fn fetch(&self, key: &str) -> AppResult<Option<StoredPayload>> {
        Ok(self.objects.read().await.get(key).cloned())
    }

    async fn download_link(&self, key: &str, filename: &str) -> AppResult<String> {
        Ok(format!(
            "{}/{}?filename={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(key),
            urlencoding::encode(filename)
        ))
    }
}
