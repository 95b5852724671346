//! Application configuration.
//!
//! Loaded from an optional YAML file, then overridden by environment
//! variables. Everything has a default, so a missing config file is not
//! an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Where the durable app state lives.
    #[serde(default = "defaults::state_path")]
    pub state_path: PathBuf,

    /// Save after every command.
    #[serde(default = "defaults::autosave")]
    pub autosave: bool,

    /// Prompt shown by the interactive shell.
    #[serde(default = "defaults::prompt")]
    pub prompt: String,
}

mod defaults {
    use std::path::PathBuf;

    pub(crate) fn state_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("git-tutor/state.json")
    }

    pub(crate) fn autosave() -> bool {
        true
    }

    pub(crate) fn prompt() -> String {
        "git-tutor> ".to_string()
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        TutorConfig {
            state_path: defaults::state_path(),
            autosave: defaults::autosave(),
            prompt: defaults::prompt(),
        }
    }
}

impl TutorConfig {
    /// Load from the config file if present, then apply env overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            TutorConfig::default()
        };

        if let Ok(path) = env::var("GIT_TUTOR_STATE") {
            config.state_path = PathBuf::from(path);
        }
        if let Ok(autosave) = env::var("GIT_TUTOR_AUTOSAVE") {
            config.autosave = autosave != "0" && !autosave.eq_ignore_ascii_case("false");
        }
        if let Ok(prompt) = env::var("GIT_TUTOR_PROMPT") {
            config.prompt = prompt;
        }

        Ok(config)
    }

    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("git-tutor/config.yaml"))
            .context("could not determine the config directory")
    }
}
