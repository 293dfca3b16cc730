//! Modules and the descriptors of their fields.

mod deferred;
mod field;
mod module;
mod slot;
mod tag;

pub use deferred::Deferred;
pub use field::{Field, Role};
pub use module::{Module, Provider};
pub use slot::Slot;
pub use tag::{parse_tag_value, Tag, TagError, TagOptions};
