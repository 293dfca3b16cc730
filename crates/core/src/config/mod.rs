pub mod binder_config;
pub mod sources;
pub mod validation;

pub use binder_config::BinderConfig;
pub use sources::ConfigSource;
pub use validation::ConfigError;
