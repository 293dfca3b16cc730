use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigSource};
use crate::producers::{DEFAULT_PRODUCERS, INJECT_TAG, PROVIDE_TAG};

pub const TRACE_ENV: &str = "MODBIND_TRACE";
pub const ENV_PREFIX_ENV: &str = "MODBIND_ENV_PREFIX";
pub const FILE_ROOT_ENV: &str = "MODBIND_FILE_ROOT";
pub const DISABLED_PRODUCERS_ENV: &str = "MODBIND_DISABLED_PRODUCERS";

/// Settings consumed by a [`Binder`](crate::binding::Binder).
///
/// ```yaml
/// trace_bindings: true
/// env_prefix: APP_
/// file_root: /etc/app
/// disabled_producers: [flag]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Log binding events at info level instead of debug
    pub trace_bindings: bool,
    /// Prefix prepended to variable names read by the env producer
    pub env_prefix: Option<String>,
    /// Directory relative file paths are resolved against
    pub file_root: Option<PathBuf>,
    /// Built-in producers that are not registered
    pub disabled_producers: Vec<String>,
    #[serde(skip)]
    loaded_from: Option<PathBuf>,
}

impl BinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_bindings(mut self, enabled: bool) -> Self {
        self.trace_bindings = enabled;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn with_file_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.file_root = Some(root.into());
        self
    }

    pub fn disable(mut self, producer: impl Into<String>) -> Self {
        self.disabled_producers.push(producer.into());
        self
    }

    /// Check if the named built-in producer is disabled
    pub fn is_disabled(&self, producer: &str) -> bool {
        self.disabled_producers.iter().any(|name| name == producer)
    }

    /// Load configuration from `MODBIND_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Ok(trace) = env::var(TRACE_ENV) {
            config.trace_bindings = parse_flag(TRACE_ENV, &trace)?;
        }

        config.env_prefix = env::var(ENV_PREFIX_ENV).ok();
        config.file_root = env::var(FILE_ROOT_ENV).ok().map(PathBuf::from);

        if let Ok(disabled) = env::var(DISABLED_PRODUCERS_ENV) {
            config.disabled_producers = disabled
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&contents)?;
        config.loaded_from = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in &self.disabled_producers {
            if name == PROVIDE_TAG || name == INJECT_TAG {
                return Err(ConfigError::ReservedProducer { name: name.clone() });
            }
            if !DEFAULT_PRODUCERS.contains(&name.as_str()) {
                return Err(ConfigError::unknown_producer(name.as_str(), &DEFAULT_PRODUCERS));
            }
        }

        if let Some(prefix) = &self.env_prefix {
            if prefix.contains('=') || prefix.contains('\0') {
                return Err(ConfigError::invalid_setting(
                    "env_prefix",
                    prefix.clone(),
                    "an environment variable name prefix without '=' or NUL",
                ));
            }
        }

        Ok(())
    }

    /// Where each setting came from, for diagnostics
    pub fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();

        sources.insert(
            "trace_bindings".to_string(),
            self.source_of(TRACE_ENV, !self.trace_bindings, "false"),
        );
        sources.insert(
            "env_prefix".to_string(),
            self.source_of(ENV_PREFIX_ENV, self.env_prefix.is_none(), "none"),
        );
        sources.insert(
            "file_root".to_string(),
            self.source_of(FILE_ROOT_ENV, self.file_root.is_none(), "working directory"),
        );
        sources.insert(
            "disabled_producers".to_string(),
            self.source_of(
                DISABLED_PRODUCERS_ENV,
                self.disabled_producers.is_empty(),
                "none",
            ),
        );

        sources
    }

    fn source_of(&self, var: &str, is_default: bool, default: &str) -> ConfigSource {
        if env::var(var).is_ok() {
            ConfigSource::Env { var: var.to_string() }
        } else if is_default {
            ConfigSource::Default { value: default.to_string() }
        } else if let Some(path) = &self.loaded_from {
            ConfigSource::File { path: path.clone() }
        } else {
            ConfigSource::Builder
        }
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid_setting(var, value, "true or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for var in [TRACE_ENV, ENV_PREFIX_ENV, FILE_ROOT_ENV, DISABLED_PRODUCERS_ENV] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        env::set_var(TRACE_ENV, "yes");
        env::set_var(ENV_PREFIX_ENV, "APP_");
        env::set_var(DISABLED_PRODUCERS_ENV, "flag, file");

        let config = BinderConfig::from_env().unwrap();
        assert!(config.trace_bindings);
        assert_eq!(config.env_prefix.as_deref(), Some("APP_"));
        assert_eq!(config.file_root, None);
        assert!(config.is_disabled("flag"));
        assert!(config.is_disabled("file"));
        assert!(!config.is_disabled("env"));

        let sources = config.config_sources();
        assert!(sources["trace_bindings"].is_env());
        assert!(sources["file_root"].is_default());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        env::set_var(TRACE_ENV, "sometimes");
        assert!(matches!(
            BinderConfig::from_env(),
            Err(ConfigError::InvalidSetting { .. })
        ));

        clear_env();
        env::set_var(DISABLED_PRODUCERS_ENV, "inject");
        assert!(matches!(
            BinderConfig::from_env(),
            Err(ConfigError::ReservedProducer { .. })
        ));
        clear_env();
    }

    #[test]
    fn test_validate_disabled_producers() {
        assert!(BinderConfig::new().disable("env").validate().is_ok());
        assert!(BinderConfig::new().disable("provide").validate().is_err());
        assert!(BinderConfig::new().with_env_prefix("A=B").validate().is_err());
        let err = BinderConfig::new().disable("ldap").validate().unwrap_err();
        assert!(err.to_string().contains("one of: literal, env, flag, file"));
    }

    #[test]
    #[serial]
    fn test_from_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "trace_bindings: true\nfile_root: /srv/app").unwrap();

        let config = BinderConfig::from_file(file.path()).unwrap();
        assert!(config.trace_bindings);
        assert_eq!(config.file_root, Some(PathBuf::from("/srv/app")));
        assert!(config.disabled_producers.is_empty());

        let sources = config.config_sources();
        assert!(sources["trace_bindings"].is_file());
        assert!(sources["disabled_producers"].is_default());
    }

    #[test]
    fn test_missing_file() {
        let err = BinderConfig::from_file("/nonexistent/modbind.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_from_yaml_str_errors() {
        assert!(matches!(
            BinderConfig::from_yaml_str("trace_bindings: [1"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
