use crate::domain::user::AuthenticatedUser;
use crate::domain::DomainError;
use crate::infrastructure::storage::{validate_key, AssetStorage};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub key: String,
    pub url: String,
}

pub struct MediaService {
    storage: Arc<dyn AssetStorage>,
}

impl MediaService {
    pub fn new(storage: Arc<dyn AssetStorage>) -> Self {
        Self { storage }
    }

    pub async fn upload(
        &self,
        who: &AuthenticatedUser,
        key: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaResponse, DomainError> {
        validate_key(key)?;
        if bytes.is_empty() {
            return Err(DomainError::field("file", "The submitted file is empty."));
        }

        let size = bytes.len();
        let url = self.storage.store(key, bytes).await?;

        tracing::info!(
            "Asset stored: key={}, bytes={}, backend={}, by user_id={}",
            key,
            size,
            self.storage.backend_name(),
            who.user_id
        );
        Ok(MediaResponse {
            key: key.to_string(),
            url,
        })
    }

    pub fn url_for(&self, key: &str) -> Result<MediaResponse, DomainError> {
        Ok(MediaResponse {
            key: key.to_string(),
            url: self.storage.resolve(key)?,
        })
    }
}
