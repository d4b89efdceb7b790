use std::path::{Path, PathBuf};

use roster_types::User;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const DEFAULT_DATA_FILE: &str = "users.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of [`RecordStore::try_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    /// The file did not exist and has been initialised with an empty collection.
    Created,
    Existing(Vec<User>),
}

/// The whole user collection stored as one JSON array in one file.
///
/// Every save rewrites the file completely. [`RecordStore::load`] and
/// [`RecordStore::save`] never fail: errors are logged and degrade to an empty
/// collection or a no-op. Use the `try_` variants to see the error.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(dir: &Path, file_name: &str) -> Self {
        Self::at(dir.join(file_name))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Vec<User> {
        match self.try_load() {
            Ok(Loaded::Created) => {
                warn!(
                    "{} not found, created an empty data file",
                    self.path.display()
                );
                Vec::new()
            }
            Ok(Loaded::Existing(users)) => {
                debug!("Loaded {} users from {}", users.len(), self.path.display());
                users
            }
            Err(e) => {
                error!("Error loading users from file: {}", e);
                Vec::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<Loaded, StoreError> {
        if !self.path.exists() {
            self.try_save(&[])?;
            return Ok(Loaded::Created);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let users: Vec<User> = serde_json::from_str(&content).map_err(|e| self.json_error(e))?;
        Ok(Loaded::Existing(users))
    }

    pub fn save(&self, users: &[User]) {
        match self.try_save(users) {
            Ok(()) => info!("Saved {} users to {}", users.len(), self.path.display()),
            Err(e) => error!("Error saving users to file: {}", e),
        }
    }

    pub fn try_save(&self, users: &[User]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let content = serde_json::to_string_pretty(users).map_err(|e| self.json_error(e))?;
        std::fs::write(&self.path, content).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    /// Copies the data file into `dir/name`. Returns `None` when there is no
    /// data file yet.
    pub fn backup_to(&self, dir: &Path, name: &str) -> Result<Option<PathBuf>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let target = dir.join(name);
        std::fs::copy(&self.path, &target).map_err(|source| StoreError::Io {
            path: target.clone(),
            source,
        })?;
        info!("Backup created: {}", target.display());
        Ok(Some(target))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> StoreError {
        StoreError::Json {
            path: self.path.clone(),
            source,
        }
    }
}
