//! Where app state lives between sessions.
//!
//! The file store writes a temp file and renames it over the target so a
//! crash mid-save never leaves a torn state file. The in-memory store
//! backs tests and `--no-save` sessions.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppState;

pub trait StateStore {
    /// `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<AppState>>;

    /// Atomically replace the saved state.
    fn save(&self, state: &AppState) -> Result<()>;
}

/// JSON file on disk, written atomically.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStore { path: path.as_ref().to_path_buf() }
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<AppState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read state file {}", self.path.display()))?;
        let state = AppState::from_json(&json)
            .with_context(|| format!("failed to parse state file {}", self.path.display()))?;
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create state directory {}", parent.display()))?;
        }
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, state.to_json()?)
            .with_context(|| format!("failed to write {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Volatile store for tests and no-save sessions.
#[derive(Default)]
pub struct MemoryStore {
    slot: RefCell<Option<AppState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<AppState>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        *self.slot.borrow_mut() = Some(state.clone());
        Ok(())
    }
}
