//! Value kinds and conversions for bindable field types.

mod bindable;
mod decoded;
mod factory;
mod kind;

pub use bindable::Bindable;
pub use decoded::Decoded;
pub use factory::Factory;
pub use kind::{Value, ValueKind};
