//! The binding engine: keys, gates, the field store, and the per-call orchestrator.

mod binder;
mod context;
pub mod gate;
pub mod key;
pub mod singleton;
pub mod store;

pub use binder::{BindSummary, Binder, BinderBuilder};
pub use gate::{Gate, GateError, GateRegistry, Wake};
pub use key::{BindKey, KeyType};
pub use singleton::Singleton;
pub use store::{FieldStore, StoreError, StoredValue};
