//! Error types surfaced by a bind call.

mod bind;

pub use bind::{AggregateBindingError, BindError, BoxError};
