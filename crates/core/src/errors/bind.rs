use std::fmt;

use thiserror::Error;

use crate::binding::BindKey;
use crate::producers::ProduceError;

/// Boxed error returned by user code such as [`Provider::provide`](crate::modules::Provider::provide).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while binding modules.
///
/// `ReservedTag`, `RoleConflict` and `Provider` abort a bind call immediately. Every other
/// variant is collected during the call and returned together inside
/// [`BindError::Aggregate`].
#[derive(Debug, Error)]
pub enum BindError {
    #[error("the '{tag}' tag key is reserved and may not be overridden")]
    ReservedTag { tag: String },

    #[error("field '{field}' of module '{module}' is tagged with both 'provide' and 'inject'")]
    RoleConflict { module: String, field: String },

    #[error("error during call to provide() on module '{module}': {source}")]
    Provider { module: String, source: BoxError },

    #[error("cannot inject {key} into read-only field '{field}' of module '{module}'")]
    FieldAccess {
        module: String,
        field: String,
        key: BindKey,
    },

    #[error("failed to provide value for {key} from tag key '{tag_key}' (field '{field}' of module '{module}'): {source}")]
    Produce {
        module: String,
        field: String,
        key: BindKey,
        tag_key: String,
        source: ProduceError,
    },

    #[error("{key} is already provided; field '{field}' of module '{module}' was not bound")]
    DuplicateProvide {
        module: String,
        field: String,
        key: BindKey,
    },

    #[error("injection of {key} panicked")]
    WaiterPanicked { key: BindKey },

    #[error("error collection panicked; failures of this bind call were lost")]
    CollectorPanicked,

    #[error(transparent)]
    Aggregate(#[from] AggregateBindingError),
}

impl BindError {
    /// Create a reserved tag error
    pub fn reserved_tag(tag: impl Into<String>) -> Self {
        Self::ReservedTag { tag: tag.into() }
    }

    /// Create a role conflict error
    pub fn role_conflict(module: impl Into<String>, field: impl Into<String>) -> Self {
        Self::RoleConflict {
            module: module.into(),
            field: field.into(),
        }
    }

    /// Create a provider error wrapping the failure returned by `provide()`
    pub fn provider(module: impl Into<String>, source: BoxError) -> Self {
        Self::Provider {
            module: module.into(),
            source,
        }
    }

    /// Check if the error is a reserved tag configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ReservedTag { .. })
    }

    /// Check if the error is a role conflict
    pub fn is_role_conflict(&self) -> bool {
        matches!(self, Self::RoleConflict { .. })
    }

    /// Check if the error came from a module's `provide()`
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }

    /// Check if the error is a field access error
    pub fn is_field_access(&self) -> bool {
        matches!(self, Self::FieldAccess { .. })
    }

    /// Check if the error came from a value producer
    pub fn is_produce(&self) -> bool {
        matches!(self, Self::Produce { .. })
    }

    /// Check if the error is a rejected duplicate provide
    pub fn is_duplicate_provide(&self) -> bool {
        matches!(self, Self::DuplicateProvide { .. })
    }

    /// Check if the error aggregates collected failures
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate(_))
    }

    /// The individual causes behind this error.
    ///
    /// An aggregate yields every collected error; anything else yields itself.
    pub fn causes(&self) -> &[BindError] {
        match self {
            Self::Aggregate(aggregate) => aggregate.errors(),
            other => std::slice::from_ref(other),
        }
    }
}

/// Every recoverable failure collected during one bind call.
#[derive(Debug)]
pub struct AggregateBindingError {
    errors: Vec<BindError>,
}

impl AggregateBindingError {
    pub fn new(errors: Vec<BindError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[BindError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<BindError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for AggregateBindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n\t{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateBindingError {}
