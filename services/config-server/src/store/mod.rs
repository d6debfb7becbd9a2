//! Config store: keyed collections of bot and engine configs.
//!
//! Both backends run record validation before any mutation so the HTTP layer
//! sees the same typed outcomes whichever one is configured.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::ConfigRecord;

mod memory;
mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::{connect, PgStore};

/// CRUD contract over one record type, keyed by record id.
#[async_trait]
pub trait ConfigStore<R: ConfigRecord>: Send + Sync {
    /// All records in insertion order.
    async fn get_all(&self) -> Result<Vec<R>, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<R, StoreError>;

    /// Insert a new record. Fails with `Conflict` when the id is taken.
    async fn create(&self, record: R) -> Result<R, StoreError>;

    /// Replace the record with the same id. Fails with `NotFound` when absent.
    async fn update(&self, record: R) -> Result<R, StoreError>;

    /// Remove and return the record.
    async fn delete(&self, id: &str) -> Result<R, StoreError>;

    /// Backend reachability, used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(crate) fn validate_record<R: ConfigRecord>(record: &R) -> Result<(), StoreError> {
    record.validate().map_err(|e| StoreError::Validation {
        kind: R::KIND,
        message: e.to_string(),
    })
}

pub(crate) fn not_found<R: ConfigRecord>(id: &str) -> StoreError {
    StoreError::NotFound {
        kind: R::KIND,
        id: id.to_string(),
    }
}

pub(crate) fn conflict<R: ConfigRecord>(id: &str) -> StoreError {
    StoreError::Conflict {
        kind: R::KIND,
        id: id.to_string(),
    }
}
