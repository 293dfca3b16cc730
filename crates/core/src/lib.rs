//! # modbind-core
//!
//! Binds values between the fields of a set of modules. Fields tagged `provide` publish a
//! value under a key of (type, name); fields tagged `inject` receive the value published
//! under the same key. Modules may be listed in any order: every inject field waits on its
//! own thread until its key is provided or the scan over all modules finishes.
//!
//! ```ignore
//! use modbind_core::Binder;
//! use modbind_derive::Module;
//!
//! #[derive(Module)]
//! struct Config {
//!     #[bind(provide = "greeting", literal = "hello")]
//!     greeting: String,
//! }
//!
//! #[derive(Module)]
//! struct Greeter {
//!     #[bind(inject = "greeting")]
//!     greeting: String,
//! }
//!
//! let (mut config, mut greeter) = (Config::default(), Greeter::default());
//! Binder::new().bind(&mut [&mut greeter, &mut config])?;
//! assert_eq!(greeter.greeting, "hello");
//! ```

pub mod binding;
pub mod config;
pub mod errors;
pub mod logging;
pub mod modules;
pub mod producers;
pub mod values;

pub use binding::{BindKey, BindSummary, Binder, BinderBuilder, Singleton};
pub use config::{BinderConfig, ConfigError, ConfigSource};
pub use errors::{AggregateBindingError, BindError, BoxError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use modules::{Deferred, Field, Module, Provider, Role, Slot, Tag};
pub use producers::{FlagProducer, ProduceError, ValueProducer};
pub use values::{Bindable, Decoded, Factory, Value, ValueKind};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
