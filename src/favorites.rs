//! Favorite coins, persisted as a JSON object `{ "<identifier>": true, ... }`.
//!
//! The whole mapping is rewritten on every mutation. Writes go to a temp file
//! in the same directory and are renamed into place, so a crash mid-write
//! never leaves a truncated file behind.

use crate::error::{CoinwatchError, Result};
use crate::registry::Registry;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

pub struct Favorites {
    path: PathBuf,
    coins: BTreeMap<String, bool>,
}

impl Favorites {
    /// Load the mapping. A missing file yields an empty mapping.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let coins = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, coins })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mapping(&self) -> &BTreeMap<String, bool> {
        &self.coins
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.coins.contains_key(identifier)
    }

    /// Favorite identifiers in mapping order.
    pub fn list(&self) -> Vec<&str> {
        self.coins.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Mark a registered coin as favorite and persist.
    pub fn add(&mut self, identifier: &str, registry: &Registry) -> Result<()> {
        if !registry.exists(identifier) {
            return Err(CoinwatchError::UnknownCoin(identifier.to_string()));
        }
        self.coins.insert(identifier.to_string(), true);
        self.save()?;
        info!(identifier, "added favorite");
        Ok(())
    }

    /// Remove a favorite and persist.
    pub fn remove(&mut self, identifier: &str) -> Result<()> {
        if self.coins.remove(identifier).is_none() {
            return Err(CoinwatchError::NotFavorite(identifier.to_string()));
        }
        self.save()?;
        info!(identifier, "removed favorite");
        Ok(())
    }

    /// Write the entire mapping to disk.
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer(&mut tmp, &self.coins)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| CoinwatchError::Io(e.error))?;
        Ok(())
    }
}
