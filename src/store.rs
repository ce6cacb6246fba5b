//! Flat-file record store for tracked dotfiles.
//!
//! Records are kept as a JSON array in a single file relative to the
//! invocation directory. Every query re-reads the file and every mutation
//! rewrites it whole, so "load, merge, write" is the unit of work. The tool
//! assumes exclusive single-user access; concurrent external edits are
//! last-writer-wins.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default store file, resolved against the current working directory.
pub const DEFAULT_STORE_FILE: &str = "dots.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No such dotfile: {0}")]
    NotFound(String),
    #[error("failed to access the record store")]
    Io(#[from] io::Error),
    #[error("failed to serialize records")]
    Serialize(#[from] serde_json::Error),
}

/// One tracked (name, path) pair.
///
/// `name` is the user-facing identifier, typically an entry of the user's
/// configuration directory; `path` is the filesystem path that gets
/// archived. Equality is structural over both fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotfileRecord {
    pub name: String,
    pub path: PathBuf,
}

impl DotfileRecord {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_FILE)
    }
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records from the backing file.
    ///
    /// A missing file is created empty and yields no records. Contents that
    /// do not parse as a record array also yield no records; only real I/O
    /// failures propagate.
    pub fn load(&self) -> Result<Vec<DotfileRecord>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::write(&self.path, b"")?;
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_slice(&raw).unwrap_or_default())
    }

    /// Merge `new_records` into the store and rewrite it.
    ///
    /// Existing records keep their order; incoming records that are not
    /// already structurally present are appended in input order, so saving
    /// the same records twice is a no-op.
    pub fn save(&self, new_records: &[DotfileRecord]) -> Result<(), StoreError> {
        let mut records = self.load()?;
        for record in new_records {
            if !records.contains(record) {
                records.push(record.clone());
            }
        }
        debug!(count = records.len(), "saving record store");
        self.write(&records)
    }

    /// Drop every record with the given name and rewrite the store.
    ///
    /// Fails with [`StoreError::NotFound`] and performs no write when the
    /// name is not tracked.
    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let mut records = self.load()?;
        if !records.iter().any(|r| r.name == name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        records.retain(|r| r.name != name);
        debug!(name, "removed record");
        self.write(&records)
    }

    fn write(&self, records: &[DotfileRecord]) -> Result<(), StoreError> {
        let data = serde_json::to_vec(records)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
