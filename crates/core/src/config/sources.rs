use std::fmt;
use std::path::PathBuf;

/// Origin of one [`BinderConfig`](super::BinderConfig) setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from a `MODBIND_*` variable
    Env { var: String },
    /// Read from a YAML config file
    File { path: PathBuf },
    /// Left at its default
    Default { value: String },
    /// Set through the builder methods
    Builder,
}

impl ConfigSource {
    pub fn is_env(&self) -> bool {
        matches!(self, Self::Env { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default { .. })
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env { var } => write!(f, "env ${}", var),
            Self::File { path } => write!(f, "file {}", path.display()),
            Self::Default { value } => write!(f, "default ({})", value),
            Self::Builder => f.write_str("builder"),
        }
    }
}
