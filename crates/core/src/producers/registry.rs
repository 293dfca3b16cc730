use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::BinderConfig;
use crate::producers::{EnvProducer, FileProducer, FlagProducer, LiteralProducer, ValueProducer};

/// Tag key marking a field that provides a value.
pub const PROVIDE_TAG: &str = "provide";
/// Tag key marking a field that receives a value.
pub const INJECT_TAG: &str = "inject";
/// Provide option that memoizes a provided function.
pub const SINGLETON_OPTION: &str = "singleton";
/// Producers registered by [`ProducerRegistry::defaults`].
pub const DEFAULT_PRODUCERS: [&str; 4] = ["literal", "env", "flag", "file"];

/// Named value producers, keyed by the tag key that selects them.
#[derive(Clone, Default)]
pub struct ProducerRegistry {
    producers: HashMap<String, Arc<dyn ValueProducer>>,
}

impl ProducerRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in producers, minus any disabled by `config`.
    ///
    /// The flag producer starts empty; supply parsed arguments with
    /// [`BinderBuilder::with_flags`](crate::binding::BinderBuilder::with_flags).
    pub fn defaults(config: &BinderConfig) -> Self {
        let mut registry = Self::new();

        let mut env = EnvProducer::new();
        if let Some(prefix) = &config.env_prefix {
            env = env.with_prefix(prefix.clone());
        }
        let mut file = FileProducer::new();
        if let Some(root) = &config.file_root {
            file = file.with_root(root.clone());
        }

        let builtins: [(&str, Arc<dyn ValueProducer>); 4] = [
            ("literal", Arc::new(LiteralProducer)),
            ("env", Arc::new(env)),
            ("flag", Arc::new(FlagProducer::new())),
            ("file", Arc::new(file)),
        ];
        for (name, producer) in builtins {
            if !config.is_disabled(name) {
                registry.producers.insert(name.to_string(), producer);
            }
        }
        registry
    }

    /// Register `producer` under `name`, returning the producer it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        producer: impl ValueProducer + 'static,
    ) -> Option<Arc<dyn ValueProducer>> {
        self.producers.insert(name.into(), Arc::new(producer))
    }

    pub(crate) fn insert(&mut self, name: String, producer: Arc<dyn ValueProducer>) {
        self.producers.insert(name, producer);
    }

    /// The producer registered under tag key `name`
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ValueProducer>> {
        self.producers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.producers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.producers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Reserved tag keys that have a producer registered under them.
    pub fn reserved_names(&self) -> Vec<&'static str> {
        [PROVIDE_TAG, INJECT_TAG]
            .into_iter()
            .filter(|name| self.contains(name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}

impl fmt::Debug for ProducerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerRegistry")
            .field("producers", &self.names())
            .finish()
    }
}
