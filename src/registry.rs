//! The list of coins the user tracks, backed by a one-identifier-per-line file.

use crate::client::CoinGeckoClient;
use crate::error::{CoinwatchError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct Registry {
    path: PathBuf,
    coins: Vec<String>,
}

impl Registry {
    /// Load the registry file. A missing file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(CoinwatchError::NotFound(format!(
                "coin registry {} does not exist",
                path.display()
            )));
        }
        let contents = fs::read_to_string(&path)?;
        let coins = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self { path, coins })
    }

    /// Load the registry file, creating an empty one first if it is missing.
    pub fn load_or_init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, "")?;
            info!(path = %path.display(), "created empty coin registry");
        }
        Self::load(path)
    }

    /// Location of the registry file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `identifier` is already registered.
    pub fn exists(&self, identifier: &str) -> bool {
        self.coins.iter().any(|c| c == identifier)
    }

    /// Identifiers in file order.
    pub fn coins(&self) -> &[String] {
        &self.coins
    }

    /// Zero-based lookup.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.coins.get(index).map(String::as_str)
    }

    /// Number of registered coins.
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Whether no coin is registered.
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Validate `identifier` against the API and append it on success.
    ///
    /// Does not check for duplicates; callers check [`exists`](Self::exists)
    /// first. Nothing is written unless the lookup returns HTTP 200.
    pub fn add(&mut self, identifier: &str, client: &CoinGeckoClient) -> Result<()> {
        if !client.coin_exists(identifier)? {
            return Err(CoinwatchError::UnknownCoin(identifier.to_string()));
        }
        self.append(identifier)
    }

    fn append(&mut self, identifier: &str) -> Result<()> {
        // A hand-edited file may lack the final newline.
        let needs_newline = fs::read(&self.path)
            .map(|bytes| bytes.last().is_some_and(|b| *b != b'\n'))
            .unwrap_or(false);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_newline {
            writeln!(file)?;
        }
        writeln!(file, "{identifier}")?;
        self.coins.push(identifier.to_string());
        info!(identifier, "coin added to registry");
        Ok(())
    }
}
