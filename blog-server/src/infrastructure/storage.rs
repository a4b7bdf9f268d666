//! Asset storage backends.
//!
//! [`build_storage`] turns the configured [`StorageConfig`] into either a
//! local-disk store or an S3 store for one [`AssetClass`]. Media uploads and
//! static files share the backend but live under separate roots or prefixes.
//! Both stores hand back public URLs; neither is consulted when serving blogs.

use crate::domain::DomainError;
use crate::infrastructure::config::{S3Config, StorageConfig};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::PathBuf;
use std::sync::Arc;

#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Persists `bytes` under `key` and returns the public URL.
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<String, DomainError>;

    /// Public URL for `key`. Does not check that the object exists.
    fn resolve(&self, key: &str) -> Result<String, DomainError>;

    fn backend_name(&self) -> &'static str;
}

/// Rejects keys that are empty, absolute, or able to escape the storage root.
pub fn validate_key(key: &str) -> Result<(), DomainError> {
    let reason = if key.is_empty() {
        Some("This field may not be blank.")
    } else if key.starts_with('/') || key.contains('\\') {
        Some("Key must be a relative path.")
    } else if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        Some("Key contains an invalid path segment.")
    } else if key.chars().any(char::is_control) {
        Some("Key contains control characters.")
    } else {
        None
    };

    match reason {
        Some(message) => Err(DomainError::field("key", message)),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Media,
    Static,
}

pub async fn build_storage(config: &StorageConfig, class: AssetClass) -> Arc<dyn AssetStorage> {
    match config {
        StorageConfig::Local {
            media,
            static_files,
        } => {
            let dir = match class {
                AssetClass::Media => media,
                AssetClass::Static => static_files,
            };
            tracing::info!("Using local {:?} storage at {:?}", class, dir.root);
            Arc::new(LocalStorage::new(dir.root.clone(), dir.base_url.clone()))
        }
        StorageConfig::S3(s3) => {
            let location = match class {
                AssetClass::Media => &s3.media_location,
                AssetClass::Static => &s3.static_location,
            };
            tracing::info!(
                "Using S3 {:?} storage: bucket={}, location={}",
                class,
                s3.bucket,
                location
            );
            Arc::new(S3Storage::new(s3, location).await)
        }
    }
}

pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AssetStorage for LocalStorage {
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<String, DomainError> {
        validate_key(key)?;
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!("Failed to create media directory {:?}: {}", parent, e);
                DomainError::StorageError(e.to_string())
            })?;
        }

        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            tracing::error!("Failed to write media file {:?}: {}", path, e);
            DomainError::StorageError(e.to_string())
        })?;

        tracing::debug!("Stored {} bytes at {:?}", bytes.len(), path);
        self.resolve(key)
    }

    fn resolve(&self, key: &str) -> Result<String, DomainError> {
        validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

pub struct S3Storage {
    client: Client,
    bucket: String,
    location: String,
    custom_domain: String,
    cache_control: String,
}

impl S3Storage {
    pub async fn new(config: &S3Config, location: &str) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "blog-server",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let aws_config = loader.load().await;

        // Custom endpoints (MinIO and similar) expect path-style addressing.
        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(config.endpoint_url.is_some())
                .build(),
        );

        Self {
            client,
            bucket: config.bucket.clone(),
            location: location.to_string(),
            custom_domain: config.custom_domain.clone(),
            cache_control: config.cache_control.clone(),
        }
    }
}

fn object_key(location: &str, key: &str) -> String {
    if location.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", location, key)
    }
}

fn object_url(custom_domain: &str, location: &str, key: &str) -> String {
    format!(
        "https://{}/{}",
        custom_domain.trim_end_matches('/'),
        object_key(location, key)
    )
}

#[async_trait]
impl AssetStorage for S3Storage {
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<String, DomainError> {
        validate_key(key)?;
        let object = object_key(&self.location, key);
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object)
            .cache_control(&self.cache_control)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("S3 upload of {} failed: {}", object, e);
                DomainError::StorageError(e.to_string())
            })?;

        tracing::debug!("Uploaded {} bytes to s3://{}/{}", size, self.bucket, object);
        self.resolve(key)
    }

    fn resolve(&self, key: &str) -> Result<String, DomainError> {
        validate_key(key)?;
        Ok(object_url(&self.custom_domain, &self.location, key))
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
