//! Versioned durable state.
//!
//! One typed object carries everything worth keeping between sessions:
//! lesson progress (each with its repo snapshot and checkpoints), badges,
//! and the remote store. The wire format is JSON with an explicit
//! `version` field; unknown or missing fields default safely.

pub mod store;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::badges::BadgeMap;
use crate::lessons::LessonState;
use crate::remote::RemoteStore;

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub version: u32,
    #[serde(default)]
    pub active_lesson_id: Option<String>,
    #[serde(default)]
    pub lessons: BTreeMap<String, LessonState>,
    #[serde(default)]
    pub badges: BadgeMap,
    #[serde(default)]
    pub remote_store: RemoteStore,
}

impl AppState {
    pub fn new() -> Self {
        AppState { version: STATE_VERSION, ..AppState::default() }
    }

    /// Imports accept exactly the current version.
    pub fn validate(&self) -> Result<()> {
        if self.version != STATE_VERSION {
            bail!("unsupported state version {} (expected {STATE_VERSION})", self.version);
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let state: AppState = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lessons::LessonState;
    use crate::repo::Repo;

    #[test]
    fn round_trip_preserves_state() {
        let mut state = AppState::new();
        state.active_lesson_id = Some("basics".to_string());
        let mut lesson = LessonState::default();
        let mut repo = Repo::new();
        repo.initialized = true;
        repo.working_files.insert("/a".into(), "1".into());
        lesson.repo = Some(repo.clone());
        lesson.checkpoints.insert(0, repo);
        lesson.step_index = 2;
        state.lessons.insert("basics".to_string(), lesson);
        state.remote_store.seed();

        let json = state.to_json().unwrap();
        let loaded = AppState::from_json(&json).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let json = r#"{"version": 2}"#;
        assert!(AppState::from_json(json).is_err());
    }

    #[test]
    fn missing_fields_default() {
        let state = AppState::from_json(r#"{"version": 1}"#).unwrap();
        assert!(state.lessons.is_empty());
        assert!(state.badges.is_empty());
        assert!(state.active_lesson_id.is_none());
    }
}
