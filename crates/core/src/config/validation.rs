use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`BinderConfig`](super::BinderConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("setting '{setting}' has invalid value '{value}', expected {expected}")]
    InvalidSetting {
        setting: String,
        value: String,
        expected: String,
    },

    #[error("'{name}' is a tag key and cannot name a producer")]
    ReservedProducer { name: String },

    #[error("unknown producer '{name}', expected one of: {known}")]
    UnknownProducer { name: String, known: String },

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn invalid_setting(
        setting: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidSetting {
            setting: setting.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub fn unknown_producer(name: impl Into<String>, known: &[&str]) -> Self {
        Self::UnknownProducer {
            name: name.into(),
            known: known.join(", "),
        }
    }
}
