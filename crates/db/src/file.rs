use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{NewRequest, RequestDocument, RequestRecord, RequestStore, StoreError};

/// Request store mirrored to a JSON document.
///
/// Every mutation rewrites the whole document while holding the lock, so the
/// file always matches the list after the last completed mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: Mutex<RequestDocument>,
}

impl JsonFileStore {
    /// Load the document at `path`.
    ///
    /// A missing file, or one that is not JSON at all, is replaced with an
    /// empty document. A parsed document is read leniently and left untouched
    /// on disk until the next mutation. This never fails, problems are only
    /// logged.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let document = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => {
                    let document = RequestDocument::from_value(value);
                    tracing::info!(
                        path = %path.display(),
                        requests = document.requests.len(),
                        "request store loaded"
                    );
                    Some(document)
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "request store is not valid JSON");
                    None
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "request store not found");
                None
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to read request store");
                None
            }
        };

        let store = Self {
            path,
            document: Mutex::new(document.clone().unwrap_or_default()),
        };

        if document.is_none() {
            tracing::info!(path = %store.path.display(), "initializing empty request store");
            if let Err(error) = store.persist(&RequestDocument::default()).await {
                tracing::error!(%error, "failed to initialize request store");
            }
        }

        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, document: &RequestDocument) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(
            path = %self.path.display(),
            requests = document.requests.len(),
            "request store persisted"
        );
        Ok(())
    }
}

#[async_trait]
impl RequestStore for JsonFileStore {
    async fn list(&self) -> Vec<RequestRecord> {
        self.document.lock().await.requests.clone()
    }

    async fn add(&self, request: NewRequest) -> Result<RequestRecord, StoreError> {
        let mut document = self.document.lock().await;
        let record = document.push(request);
        self.persist(&document).await?;
        tracing::info!(id = %record.id, title = %record.title, "request added");
        Ok(record)
    }

    async fn toggle(&self, id: &str) -> Result<bool, StoreError> {
        let mut document = self.document.lock().await;
        if !document.toggle(id) {
            tracing::debug!(id, "toggle ignored, no such request");
            return Ok(false);
        }
        self.persist(&document).await?;
        tracing::info!(id, "request availability toggled");
        Ok(true)
    }

    async fn remove(&self, id: &str) -> Result<usize, StoreError> {
        let mut document = self.document.lock().await;
        let removed = document.remove(id);
        self.persist(&document).await?;
        tracing::info!(id, removed, "request removed");
        Ok(removed)
    }
}
