//! Value producers turn a tag option into a typed value for a provided field.

mod env;
mod error;
mod file;
mod flag;
mod literal;
mod registry;

pub use env::EnvProducer;
pub use error::ProduceError;
pub use file::FileProducer;
pub use flag::FlagProducer;
pub use literal::{parse_literal, LiteralProducer};
pub use registry::{
    ProducerRegistry, DEFAULT_PRODUCERS, INJECT_TAG, PROVIDE_TAG, SINGLETON_OPTION,
};

use crate::values::{Value, ValueKind};

/// Builds a value of the requested kind from a tag option.
///
/// `Ok(None)` means the producer did not handle the option (an unset environment variable, a
/// missing file) and the next tag key should be tried.
pub trait ValueProducer: Send + Sync {
    fn attempt(&self, kind: &ValueKind, option: &str) -> Result<Option<Value>, ProduceError>;
}

impl<F> ValueProducer for F
where
    F: Fn(&ValueKind, &str) -> Result<Option<Value>, ProduceError> + Send + Sync,
{
    fn attempt(&self, kind: &ValueKind, option: &str) -> Result<Option<Value>, ProduceError> {
        self(kind, option)
    }
}
