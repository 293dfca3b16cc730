//! Subscriber setup for the binder's `tracing` events.
//!
//! Binding events use the `modbind` target: `modbind=debug` shows every provide and inject,
//! or enable [`BinderConfig::trace_bindings`](crate::config::BinderConfig) to raise them to
//! info.

use std::io;

use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::BinderConfig;
use crate::errors::BoxError;

/// Output encoding of the fmt layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    Pretty,
    Json,
}

/// How [`init_logging`] builds the global subscriber
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub directives: String,
    /// Attach source file and line to every event
    pub with_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Plain,
            directives: "warn,modbind=info".to_string(),
            with_location: false,
        }
    }
}

impl LoggingConfig {
    /// JSON lines, binding events at info
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            ..Self::default()
        }
    }

    /// Every provide and inject, pretty printed with locations
    pub fn development() -> Self {
        Self {
            format: LogFormat::Pretty,
            directives: "info,modbind=debug".to_string(),
            with_location: true,
        }
    }

    pub fn test() -> Self {
        Self {
            directives: "modbind=error".to_string(),
            ..Self::default()
        }
    }

    /// Directives that surface the binding events `config` emits.
    ///
    /// With `trace_bindings` the events are at info, otherwise at debug.
    pub fn for_binder(config: &BinderConfig) -> Self {
        let level = if config.trace_bindings { "info" } else { "debug" };
        Self::default().with_directives(format!("warn,modbind={}", level))
    }

    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = directives.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    fn filter(&self) -> Result<EnvFilter, BoxError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(&self.directives)?),
        }
    }
}

/// Install a global subscriber for `config`.
///
/// Fails if the directives are invalid or a global subscriber is already set.
pub fn init_logging(config: LoggingConfig) -> Result<(), BoxError> {
    let filter = config.filter()?;
    let layer = Layer::new()
        .with_writer(io::stdout)
        .with_file(config.with_location)
        .with_line_number(config.with_location);
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry.with(layer.json()).try_init()?,
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
        LogFormat::Plain => registry.with(layer).try_init()?,
    }

    tracing::debug!(
        target: "modbind::logging",
        format = ?config.format,
        directives = %config.directives,
        "subscriber installed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_invalid_directives_are_rejected() {
        std::env::remove_var("RUST_LOG");
        let config = LoggingConfig::default().with_directives("modbind=notalevel");
        assert!(config.filter().is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(LoggingConfig::production().format, LogFormat::Json);
        assert!(LoggingConfig::development().with_location);
        assert_eq!(LoggingConfig::test().directives, "modbind=error");
    }

    #[test]
    fn test_for_binder_follows_trace_bindings() {
        let traced = BinderConfig::new().with_trace_bindings(true);
        assert_eq!(LoggingConfig::for_binder(&traced).directives, "warn,modbind=info");
        assert_eq!(
            LoggingConfig::for_binder(&BinderConfig::new()).directives,
            "warn,modbind=debug"
        );
    }
}
