//! ReadingStore trait definition.

use async_trait::async_trait;

use crate::domain::{NewReading, Reading};
use crate::error::StoreResult;

/// Trait for reading storage backends.
///
/// Handlers hold an `Arc<dyn ReadingStore>` built once at startup, so the
/// http layer works the same over the json file, memory, or any other
/// backend.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Ensure the backing collection exists, creating it empty if absent.
    ///
    /// Idempotent: never touches readings that are already stored.
    async fn initialize(&self) -> StoreResult<()>;

    /// Stamp `payload` with a fresh id and the current time, append it and
    /// persist the collection.
    ///
    /// Fails with `StoreError::MissingDeviceId` when `deviceId` is absent
    /// or falsy (null, false, 0, "").
    async fn append_reading(&self, payload: NewReading) -> StoreResult<Reading>;

    /// Every stored reading in insertion order.
    async fn list_all(&self) -> StoreResult<Vec<Reading>>;

    /// The last `limit` readings, still in insertion order.
    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<Reading>>;

    /// Remove every reading and persist the empty collection.
    async fn clear_all(&self) -> StoreResult<()>;

    /// Number of stored readings.
    async fn count(&self) -> StoreResult<usize> {
        Ok(self.list_all().await?.len())
    }
}
