//! Case-insensitive name lookup over the user's configuration directory.
//!
//! Built once per Add-screen activation from a snapshot of the directory
//! listing and read-only afterwards; never persisted.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct SuggestionIndex {
    by_key: HashMap<String, String>,
    keys: Vec<String>,
}

impl SuggestionIndex {
    /// Index every entry of `config_dir` by its lowercased name.
    ///
    /// An unreadable configuration directory means the host environment is
    /// unusable, so the error propagates to the caller.
    pub fn build(config_dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(config_dir).with_context(|| {
            format!(
                "Failed to list configuration directory {}",
                config_dir.display()
            )
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read an entry of {}", config_dir.display()))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(Self::from_names(names))
    }

    /// Build an index from plain names, without touching the filesystem.
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut by_key = HashMap::new();
        for name in names {
            by_key.insert(name.to_lowercase(), name);
        }
        let mut keys: Vec<String> = by_key.keys().cloned().collect();
        keys.sort();
        Self { by_key, keys }
    }

    /// Canonical directory-entry name for `query`, matched case-insensitively.
    pub fn resolve(&self, query: &str) -> Option<&str> {
        self.by_key.get(&query.to_lowercase()).map(String::as_str)
    }

    /// Lowercased keys, sorted; the autocomplete candidate pool.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}
