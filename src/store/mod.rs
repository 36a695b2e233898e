//! Persistence for named host lists.
//!
//! A single JSON file holds every saved list. A missing or malformed file
//! is treated as an empty collection so startup can never fail on it.

mod csv;

pub use csv::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Store error types. Only writes surface these; reads degrade to empty.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The persisted projection of a host: address and display name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedHost {
    pub hostname: String,
    pub label: String,
}

/// A named, ordered collection of saved hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesList {
    pub id: Uuid,
    pub name: String,
    pub hosts: Vec<SavedHost>,
    pub created_at: DateTime<Utc>,
}

/// File-backed collection of favorites lists.
pub struct FavoritesStore {
    path: PathBuf,
    lists: Vec<FavoritesList>,
}

impl FavoritesStore {
    /// Open the store at `path`, loading whatever is there. Absence or
    /// corruption yields an empty collection.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let lists = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(lists) => lists,
                Err(e) => {
                    tracing::warn!(
                        "Favorites file {} is malformed, starting empty: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    "Cannot read favorites file {}, starting empty: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        };
        Self { path, lists }
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hostpulse")
            .join("favorites.json")
    }

    /// All lists, in persisted order.
    pub fn lists(&self) -> &[FavoritesList] {
        &self.lists
    }

    /// Upsert a list by name: an existing list keeps its id and creation
    /// time and gets the new hosts, otherwise a fresh list is appended.
    pub fn save(&mut self, name: &str, hosts: &[SavedHost]) -> Result<(), StoreError> {
        match self.lists.iter_mut().find(|l| l.name == name) {
            Some(list) => list.hosts = hosts.to_vec(),
            None => self.lists.push(FavoritesList {
                id: Uuid::new_v4(),
                name: name.to_string(),
                hosts: hosts.to_vec(),
                created_at: Utc::now(),
            }),
        }
        self.persist()
    }

    /// Remove the list with the given id, if present.
    pub fn delete(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.lists.retain(|l| l.id != id);
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.lists)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
