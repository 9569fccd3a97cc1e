use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{NewRequest, RequestDocument, RequestRecord, RequestStore, StoreError};

/// Request store without any backing file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<RequestDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requests(requests: Vec<RequestRecord>) -> Self {
        Self {
            document: Mutex::new(RequestDocument { requests }),
        }
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn list(&self) -> Vec<RequestRecord> {
        self.document.lock().await.requests.clone()
    }

    async fn add(&self, request: NewRequest) -> Result<RequestRecord, StoreError> {
        Ok(self.document.lock().await.push(request))
    }

    async fn toggle(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.document.lock().await.toggle(id))
    }

    async fn remove(&self, id: &str) -> Result<usize, StoreError> {
        Ok(self.document.lock().await.remove(id))
    }
}
