use crate::errors::BoxError;
use crate::modules::Field;

/// A record whose fields provide or receive values during a bind call.
///
/// Usually implemented with `#[derive(Module)]`. A manual implementation lists each field
/// in declaration order:
///
/// ```ignore
/// impl Module for Server {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![
///             Field::new("port", Tag::provide("port").with("literal", "8080"), &mut self.port),
///             Field::new("db", Tag::inject(""), &mut self.db),
///         ]
///     }
/// }
/// ```
pub trait Module {
    /// Module name for diagnostics
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Descriptors for every field, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// The module's setup hook, if it has one.
    fn as_provider(&mut self) -> Option<&mut dyn Provider> {
        None
    }
}

/// One-shot setup run before a module's fields are scanned.
pub trait Provider {
    fn provide(&mut self) -> Result<(), BoxError>;
}
