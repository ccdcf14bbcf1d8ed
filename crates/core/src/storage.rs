//! JSON file-based phase storage
//!
//! Reference implementation of the persistence collaborator: the owning
//! workflow loads a phase before invoking a verb and saves it after the verb
//! returns. The engine itself never touches storage.

use crate::phase::{Phase, PhaseId};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("phase not found: {0}")]
    NotFound(PhaseId),
}

/// JSON file-based phase store
#[derive(Debug, Clone)]
pub struct JsonPhaseStore {
    base_path: PathBuf,
}

impl JsonPhaseStore {
    /// Open a store at the given path
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Open a temporary store for testing
    pub fn open_temp() -> Result<Self, StorageError> {
        let temp_dir = std::env::temp_dir().join(format!("sd-test-{}", uuid::Uuid::new_v4()));
        Self::open(temp_dir)
    }

    /// Save a phase record
    pub fn save(&self, phase: &Phase) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(phase)?;
        fs::write(self.path_for(&phase.id), json)?;
        Ok(())
    }

    /// Load a phase record by id
    pub fn load(&self, id: &PhaseId) -> Result<Phase, StorageError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.clone()));
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Delete a phase record; missing records are not an error
    pub fn delete(&self, id: &PhaseId) -> Result<(), StorageError> {
        let path = self.path_for(id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// List all stored phase ids
    pub fn list(&self) -> Result<Vec<PhaseId>, StorageError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(id) = name.to_string_lossy().strip_suffix(".json") {
                ids.push(PhaseId::new(id));
            }
        }
        ids.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(ids)
    }

    fn path_for(&self, id: &PhaseId) -> PathBuf {
        self.base_path.join(format!("{}.json", id.0))
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
