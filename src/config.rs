//! Configuration file schema for unilint.
//!
//! A configuration selects which messages run and which paths are skipped.
//! Every field is optional; no file at all means every message is enabled.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkers::MessageId;
use crate::lint::MessageFilter;

/// File names looked up in the working directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["unilint.yaml", ".unilint.yaml"];

/// Errors loading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown message {0:?} in {1} list")]
    UnknownMessage(String, &'static str),

    #[error("invalid excluded_paths pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Message codes or symbols to turn off (`all` disables everything)
    #[serde(default)]
    pub disable: Vec<String>,
    /// Message codes or symbols to force on, even if disabled
    #[serde(default)]
    pub enable: Vec<String>,
    /// Glob patterns for paths to exclude (e.g., "**/migrations/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty file is a valid, empty configuration
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a configuration file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Load `explicit` if given, otherwise whatever `discover` finds, otherwise
    /// the defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::discover(dir) {
                Some(path) => path,
                None => {
                    tracing::debug!("no configuration file in {}", dir.display());
                    return Ok(Self::default());
                }
            },
        };
        tracing::debug!("loading configuration from {}", path.display());
        let config = Self::parse_file(&path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unknown message ids and malformed globs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (list, selectors) in [("disable", &self.disable), ("enable", &self.enable)] {
            for selector in selectors {
                if MessageId::matching(selector).is_empty() {
                    return Err(ConfigError::UnknownMessage(selector.clone(), list));
                }
            }
        }

        for pattern in &self.excluded_paths {
            globset::Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
        }

        Ok(())
    }

    /// Build the message filter described by `disable` and `enable`.
    pub fn message_filter(&self) -> MessageFilter {
        let mut filter = MessageFilter::new();
        for selector in &self.disable {
            filter.disable(selector);
        }
        for selector in &self.enable {
            filter.enable(selector);
        }
        filter
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();
        self.excluded_paths.iter().any(|pattern| {
            globset::Glob::new(pattern)
                .map(|glob| glob.compile_matcher().is_match(&*path_str))
                .unwrap_or(false)
        })
    }
}
