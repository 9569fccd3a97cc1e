//! Request store for SHELF.
//!
//! Handlers talk to the [`RequestStore`] trait. [`JsonFileStore`] mirrors the
//! list into a single JSON document on every mutation; [`MemoryStore`] keeps
//! it in memory only and backs tests.

use async_trait::async_trait;

pub mod error;
pub mod file;
pub mod memory;
pub mod models;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{NewRequest, RequestDocument, RequestRecord};

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// All requests in insertion order.
    async fn list(&self) -> Vec<RequestRecord>;

    /// Append a request with a fresh id and `checked = false`.
    async fn add(&self, request: NewRequest) -> Result<RequestRecord, StoreError>;

    /// Flip `checked` on the first request with `id`.
    /// Returns `false` without persisting when no request matches.
    async fn toggle(&self, id: &str) -> Result<bool, StoreError>;

    /// Drop every request with `id` and persist, returning how many were removed.
    async fn remove(&self, id: &str) -> Result<usize, StoreError>;
}
