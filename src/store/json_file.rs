//! ==============================================================================
//! json_file.rs - whole-document json store (db.json)
//! ==============================================================================
//!
//! every operation re-reads the document from disk; nothing is cached
//! between calls. mutations rewrite the full document.
//!
//! writes:
//!     1. serialize the whole document
//!     2. write it to `<data_file>.tmp`
//!     3. rename over `<data_file>`
//!
//! mutations inside one process are serialized through `write_gate`, so two
//! concurrent appends can't both read the same old collection and lose one
//! of the updates. separate processes sharing the file are not coordinated.
//!
//! ==============================================================================

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{NewReading, Reading, ReadingsDocument};
use crate::error::StoreResult;

use super::traits::ReadingStore;

pub struct JsonFileStore {
    path: PathBuf,
    max_readings: Option<usize>,
    write_gate: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_readings: None,
            write_gate: Mutex::new(()),
        }
    }

    /// Keep at most `max` readings, dropping the oldest on append.
    pub fn with_retention(mut self, max: Option<usize>) -> Self {
        self.max_readings = max;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// raw file contents, `None` when the file does not exist
    async fn read_raw(&self) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// a missing or blank file reads as an empty collection
    async fn read_document(&self) -> StoreResult<ReadingsDocument> {
        match self.read_raw().await? {
            Some(content) if !content.trim().is_empty() => Ok(serde_json::from_str(&content)?),
            _ => Ok(ReadingsDocument::default()),
        }
    }

    async fn write_document(&self, document: &ReadingsDocument) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(document)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ReadingStore for JsonFileStore {
    async fn initialize(&self) -> StoreResult<()> {
        let _gate = self.write_gate.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        match self.read_raw().await? {
            Some(content) if !content.trim().is_empty() => {
                // surface a corrupt document at startup rather than on first request
                let document: ReadingsDocument = serde_json::from_str(&content)?;
                tracing::info!(
                    "[STORE] Using {} ({} readings)",
                    self.path.display(),
                    document.devices.len()
                );
            }
            _ => {
                self.write_document(&ReadingsDocument::default()).await?;
                tracing::info!("[STORE] Created empty {}", self.path.display());
            }
        }
        Ok(())
    }

    async fn append_reading(&self, payload: NewReading) -> StoreResult<Reading> {
        let reading = super::stamp(payload)?;

        let _gate = self.write_gate.lock().await;
        let mut document = self.read_document().await?;
        document.devices.push(reading.clone());
        super::apply_retention(&mut document.devices, self.max_readings);
        self.write_document(&document).await?;

        Ok(reading)
    }

    async fn list_all(&self) -> StoreResult<Vec<Reading>> {
        Ok(self.read_document().await?.devices)
    }

    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<Reading>> {
        let document = self.read_document().await?;
        Ok(super::tail(&document.devices, limit))
    }

    async fn clear_all(&self) -> StoreResult<()> {
        let _gate = self.write_gate.lock().await;
        self.write_document(&ReadingsDocument::default()).await
    }
}
