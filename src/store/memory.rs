//! In-memory reading store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{NewReading, Reading};
use crate::error::StoreResult;

use super::traits::ReadingStore;

/// Reading store backed by a `Vec` in process memory.
///
/// Nothing survives a restart. Appends take the write lock for the whole
/// push, so concurrent appends never lose each other.
#[derive(Default)]
pub struct MemoryStore {
    readings: RwLock<Vec<Reading>>,
    max_readings: Option<usize>,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max` readings, dropping the oldest.
    pub fn with_retention(mut self, max: Option<usize>) -> Self {
        self.max_readings = max;
        self
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn initialize(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn append_reading(&self, payload: NewReading) -> StoreResult<Reading> {
        let reading = super::stamp(payload)?;
        let mut readings = self.readings.write().await;
        readings.push(reading.clone());
        super::apply_retention(&mut readings, self.max_readings);
        Ok(reading)
    }

    async fn list_all(&self) -> StoreResult<Vec<Reading>> {
        Ok(self.readings.read().await.clone())
    }

    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<Reading>> {
        Ok(super::tail(&self.readings.read().await, limit))
    }

    async fn clear_all(&self) -> StoreResult<()> {
        self.readings.write().await.clear();
        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.readings.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SensorFields;
    use crate::store::test_support::{devices, sample};

    #[tokio::test]
    async fn test_memory_store_append_and_list() {
        let store = MemoryStore::new();
        store.initialize().await.unwrap();

        let saved = store.append_reading(sample("sim-01")).await.unwrap();
        let recent = store.list_recent(1).await.unwrap();

        assert_eq!(recent, vec![saved.clone()]);
        assert_eq!(saved.device_name(), "sim-01");
        assert_eq!(saved.soil_moisture(), Some(42.3));
        assert_eq!(saved.humidity(), Some(55.1));
        assert_eq!(saved.temperature(), Some(21.0));
    }

    #[tokio::test]
    async fn test_memory_store_recent_keeps_insertion_order() {
        let store = MemoryStore::new();
        for device in ["A", "B", "C"] {
            store.append_reading(sample(device)).await.unwrap();
        }

        assert_eq!(devices(&store.list_recent(2).await.unwrap()), vec!["B", "C"]);
        assert_eq!(store.list_recent(50).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_memory_store_clear() {
        let store = MemoryStore::new();
        store.append_reading(sample("A")).await.unwrap();
        store.append_reading(sample("B")).await.unwrap();

        store.clear_all().await.unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
        assert!(store.list_recent(100).await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_missing_device_id() {
        let store = MemoryStore::new();
        assert!(store.append_reading(NewReading::default()).await.is_err());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_retention() {
        let store = MemoryStore::new().with_retention(Some(2));
        for device in ["A", "B", "C"] {
            store.append_reading(sample(device)).await.unwrap();
        }

        assert_eq!(devices(&store.list_all().await.unwrap()), vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_memory_store_zero_retention_is_unbounded() {
        let store = MemoryStore::new().with_retention(Some(0));
        let saved = store.append_reading(sample("A")).await.unwrap();

        assert_eq!(store.list_recent(50).await.unwrap(), vec![saved]);
    }
}
