use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::Settings;

// ── Config file ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Upper bound for every git invocation.
    pub git_timeout_secs: u64,
    /// How long a status line stays in the footer.
    pub status_clear_secs: u64,
    /// How long an error banner stays up if not dismissed.
    pub error_clear_secs: u64,
    /// tracing filter used when STAGECRAFT_LOG is unset (e.g. "debug", "stagecraft=trace").
    pub log_level: String,
    /// Lines the focused preview scrolls per up/down key.
    pub scroll_step: u16,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            git_timeout_secs: 10,
            status_clear_secs: 2,
            error_clear_secs: 3,
            log_level: "info".to_string(),
            scroll_step: 3,
        }
    }
}

impl ConfigFile {
    /// Load from disk, or return a default config if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    /// Write a starter config file to disk (only if it doesn't exist).
    pub fn write_default_if_missing() -> Result<PathBuf> {
        let path = config_path();
        write_default_at(&path)?;
        Ok(path)
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs.max(1))
    }

    /// Runtime knobs handed to the application core.
    pub fn settings(&self) -> Settings {
        Settings {
            status_clear: Duration::from_secs(self.status_clear_secs),
            error_clear: Duration::from_secs(self.error_clear_secs),
            scroll_step: self.scroll_step.max(1),
        }
    }
}

fn write_default_at(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("Failed to write {}", path.display()))
}

// ── Paths ─────────────────────────────────────────────────────────────────────

pub fn config_path() -> PathBuf {
    dirs_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stagecraft")
        .join("config.toml")
}

/// Directory for the log file.
pub fn state_dir() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".local").join("state"))
        })
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stagecraft")
}

fn dirs_config_dir() -> Option<PathBuf> {
    // XDG_CONFIG_HOME or ~/.config
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

// ── Default config template written by --init ─────────────────────────────────

const DEFAULT_CONFIG_TOML: &str = r#"# stagecraft configuration
# Run `stagecraft --init` to regenerate this file.

# Seconds before a git invocation is abandoned and reported as failed.
git_timeout_secs = 10

# Seconds a status line stays in the footer.
status_clear_secs = 2

# Seconds an error banner stays up (any key dismisses it sooner).
error_clear_secs = 3

# Log filter; STAGECRAFT_LOG overrides it. The log is written to
# $XDG_STATE_HOME/stagecraft/stagecraft.log (~/.local/state/... by default).
log_level = "info"

# Lines the focused preview scrolls per j/k.
scroll_step = 3
"#;
