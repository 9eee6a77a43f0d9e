//! JSON run document
//!
//! A run document bundles the table, its metadata tree and the lock flag.
//! It is a fixture and interchange format for the reference store, not an
//! archive storage format.
//!
//! Saving writes `<path>.tmp`, fsyncs it, renames it over `path` and fsyncs
//! the parent directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::lock::Lockable;
use super::metadata::MetaNode;
use super::table::MemoryTable;

/// A run held entirely in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunArchive {
    #[serde(default)]
    locked: bool,

    table: MemoryTable,

    #[serde(default)]
    metadata: MetaNode,

    #[serde(skip)]
    name: String,
}

impl RunArchive {
    /// Creates an unlocked run with empty metadata
    pub fn new(table: MemoryTable) -> Self {
        Self {
            locked: false,
            table,
            metadata: MetaNode::new(),
            name: String::new(),
        }
    }

    /// Sets the lock flag
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Sets the name used in log records
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn table(&self) -> &MemoryTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut MemoryTable {
        &mut self.table
    }

    pub fn metadata(&self) -> &MetaNode {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut MetaNode {
        &mut self.metadata
    }

    /// Serializes to pretty JSON
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::format(format!("Failed to serialize run: {}", e)))
    }

    /// Parses a run document
    pub fn from_json(json: &str) -> StoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| StoreError::format(format!("Failed to parse run: {}", e)))
    }

    /// Loads a run document. The run's name becomes the path.
    pub fn load(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            return Err(StoreError::not_found(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::open_failed(format!("Failed to read run: {}", path.display()), e)
        })?;

        let archive = Self::from_json(&content)
            .map_err(|e| e.with_details(path.display().to_string()))?;
        Ok(archive.with_name(path.display().to_string()))
    }

    /// Writes the run document atomically with fsync
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let json = self.to_json()?;
        let tmp = tmp_path(path);

        let mut file = File::create(&tmp).map_err(|e| {
            StoreError::write_failed_io(format!("Failed to create file: {}", tmp.display()), e)
        })?;

        file.write_all(json.as_bytes()).map_err(|e| {
            StoreError::write_failed_io(format!("Failed to write run: {}", tmp.display()), e)
        })?;

        file.sync_all().map_err(|e| {
            StoreError::write_failed_io(format!("Failed to fsync run: {}", tmp.display()), e)
        })?;
        drop(file);

        fs::rename(&tmp, path).map_err(|e| {
            StoreError::write_failed_io(
                format!("Failed to rename {} to {}", tmp.display(), path.display()),
                e,
            )
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let dir = File::open(parent).map_err(|e| {
                StoreError::write_failed_io(
                    format!("Failed to open run directory for fsync: {}", parent.display()),
                    e,
                )
            })?;
            dir.sync_all().map_err(|e| {
                StoreError::write_failed_io(
                    format!("Failed to fsync run directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        Ok(())
    }
}

impl Lockable for RunArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn lock(&mut self) -> StoreResult<()> {
        self.locked = true;
        Ok(())
    }

    fn unlock(&mut self) -> StoreResult<()> {
        self.locked = false;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
