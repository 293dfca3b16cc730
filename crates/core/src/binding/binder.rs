use std::sync::Arc;

use crate::binding::context::BindContext;
use crate::binding::BindKey;
use crate::config::BinderConfig;
use crate::errors::BindError;
use crate::modules::Module;
use crate::producers::{FlagProducer, ProducerRegistry, ValueProducer};

/// Outcome of a successful bind call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindSummary {
    /// Values stored by provide fields
    pub provided: usize,
    /// Inject fields that received a value
    pub injected: usize,
    /// Keys of inject fields left untouched because nothing was bound to them
    pub unbound: Vec<BindKey>,
}

impl BindSummary {
    /// Check if every inject field received a value
    pub fn is_complete(&self) -> bool {
        self.unbound.is_empty()
    }
}

/// Binds the provide and inject fields of a set of modules.
///
/// A binder holds only configuration and producers. Every call to [`bind`](Binder::bind)
/// runs in a fresh context, so nothing bound in one call is visible to the next.
#[derive(Debug, Clone)]
pub struct Binder {
    producers: ProducerRegistry,
    config: BinderConfig,
}

impl Binder {
    /// A binder with the default producers and configuration
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a binder with custom producers or settings.
    pub fn builder() -> BinderBuilder {
        BinderBuilder::default()
    }

    /// Settings this binder was built with
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Producers consulted for provide fields, by tag key
    pub fn producers(&self) -> &ProducerRegistry {
        &self.producers
    }

    /// Check that no producer is registered under a reserved tag key.
    pub fn validate(&self) -> Result<(), BindError> {
        match self.producers.reserved_names().first() {
            Some(name) => Err(BindError::reserved_tag(*name)),
            None => Ok(()),
        }
    }

    /// Bind `modules` in order.
    ///
    /// Provide fields are bound synchronously as they are scanned. Each inject field waits
    /// on its own thread for a matching provide anywhere in `modules`; fields with no
    /// provider are left unchanged once the scan completes.
    ///
    /// Fails immediately on a reserved producer name, a field tagged both provide and
    /// inject, or a failing [`Provider`](crate::modules::Provider). Any other failure is
    /// collected and returned as a single [`BindError::Aggregate`] after every waiter
    /// has finished.
    pub fn bind(&self, modules: &mut [&mut dyn Module]) -> Result<BindSummary, BindError> {
        self.validate()?;
        BindContext::new(self).run(modules)
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Binder`]
#[derive(Default)]
pub struct BinderBuilder {
    config: BinderConfig,
    flags: Option<FlagProducer>,
    extra: Vec<(String, Arc<dyn ValueProducer>)>,
}

impl BinderBuilder {
    /// Replace the default settings
    pub fn with_config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an additional producer, replacing any built-in one with the same name.
    ///
    /// Names are checked when binding: `provide` and `inject` are rejected there.
    pub fn with_producer(
        mut self,
        name: impl Into<String>,
        producer: impl ValueProducer + 'static,
    ) -> Self {
        self.extra.push((name.into(), Arc::new(producer)));
        self
    }

    /// Use parsed command-line arguments for the `flag` producer
    pub fn with_flags(mut self, flags: FlagProducer) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Register the built-in producers, then the flags and extra producers on top.
    pub fn build(self) -> Binder {
        let mut producers = ProducerRegistry::defaults(&self.config);
        if let Some(flags) = self.flags {
            if !self.config.is_disabled("flag") {
                producers.register("flag", flags);
            }
        }
        for (name, producer) in self.extra {
            producers.insert(name, producer);
        }

        tracing::debug!(target: "modbind", producers = ?producers.names(), "binder built");
        Binder {
            producers,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producers::{LiteralProducer, ProduceError};
    use crate::values::{Value, ValueKind};

    #[test]
    fn test_reserved_names_fail_validation() {
        let binder = Binder::builder()
            .with_producer("inject", LiteralProducer)
            .build();
        let err = binder.validate().unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "the 'inject' tag key is reserved and may not be overridden"
        );
        assert!(Binder::new().validate().is_ok());
    }

    #[test]
    fn test_extra_producers_override_defaults() {
        let binder = Binder::builder()
            .with_producer(
                "env",
                |_: &ValueKind, _: &str| -> Result<Option<Value>, ProduceError> { Ok(None) },
            )
            .with_producer("vault", LiteralProducer)
            .build();
        assert_eq!(
            binder.producers().names(),
            vec!["env", "file", "flag", "literal", "vault"]
        );
    }

    #[test]
    fn test_disabled_flag_producer_ignores_flags() {
        let binder = Binder::builder()
            .with_config(BinderConfig::new().disable("flag"))
            .with_flags(FlagProducer::new().with_flag("port", "80"))
            .build();
        assert!(!binder.producers().contains("flag"));
    }
}
