#![forbid(unsafe_code)]

//! Navigation configuration loaded from JSON.
//!
//! ```json
//! {
//!   "bindings": [
//!     { "code": 37, "key": "left" },
//!     { "code": 13, "key": "enter" },
//!     { "code": 49, "key": { "digit": 1 } }
//!   ],
//!   "focus_enabled": true,
//!   "input_enabled": true
//! }
//! ```
//!
//! Every field is optional. A missing `bindings` list means the default
//! television layout ([`KeyMap::television`]); an explicit list replaces it
//! entirely.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unreadable file | I/O error | [`ConfigError::Io`] |
//! | Malformed JSON / unknown field | serde error | [`ConfigError::Json`] |
//! | Code bound twice | duplicate `code` in `bindings` | [`ConfigError::DuplicateCode`] |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::key::{KeyCode, RemoteKey};
use crate::keymap::{KeyBinding, KeyMap};

/// Errors from loading or validating a [`NavConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io { path: PathBuf, message: String },
    /// The JSON was malformed or did not match the schema.
    Json(String),
    /// One key code was bound to two keys.
    DuplicateCode {
        code: KeyCode,
        first: RemoteKey,
        second: RemoteKey,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "cannot read config {}: {message}", path.display())
            }
            Self::Json(msg) => write!(f, "invalid config JSON: {msg}"),
            Self::DuplicateCode {
                code,
                first,
                second,
            } => write!(
                f,
                "key code {code} bound twice ({first:?} and {second:?})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// One `{ "code": .., "key": .. }` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingEntry {
    pub code: KeyCode,
    pub key: RemoteKey,
}

impl From<BindingEntry> for KeyBinding {
    fn from(entry: BindingEntry) -> Self {
        KeyBinding {
            code: entry.code,
            key: entry.key,
        }
    }
}

impl From<KeyBinding> for BindingEntry {
    fn from(binding: KeyBinding) -> Self {
        BindingEntry {
            code: binding.code,
            key: binding.key,
        }
    }
}

fn default_bindings() -> Vec<BindingEntry> {
    KeyMap::television_bindings()
        .iter()
        .copied()
        .map(BindingEntry::from)
        .collect()
}

fn default_true() -> bool {
    true
}

/// Startup configuration for a navigator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavConfig {
    /// Raw code bindings.
    #[serde(default = "default_bindings")]
    pub bindings: Vec<BindingEntry>,
    /// Initial state of the focus engine gate.
    #[serde(default = "default_true")]
    pub focus_enabled: bool,
    /// Initial state of the input layer gate.
    #[serde(default = "default_true")]
    pub input_enabled: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
            focus_enabled: true,
            input_enabled: true,
        }
    }
}

impl NavConfig {
    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            bindings = config.bindings.len(),
            "loaded navigation config"
        );
        Ok(config)
    }

    /// Serialize to pretty JSON.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject configs whose bindings cannot form a [`KeyMap`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.keymap().map(|_| ())
    }

    /// Build the key map described by `bindings`.
    pub fn keymap(&self) -> Result<KeyMap, ConfigError> {
        KeyMap::from_bindings(self.bindings.iter().copied().map(KeyBinding::from))
    }
}
