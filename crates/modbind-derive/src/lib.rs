//! # modbind-derive
//!
//! Derive macro for modbind-core modules.
//!
//! - `#[derive(Module)]`: implement `Module` by listing every `#[bind(...)]` field

use proc_macro::TokenStream;

mod module;

/// Derive `modbind_core::modules::Module` for a struct with named fields.
///
/// Each `#[bind(key = "value", ...)]` attribute becomes the field's tag, keeping the order of
/// its keys. A key without a value, like `inject`, gets an empty value. Fields without a
/// `#[bind]` attribute are not bound.
///
/// `#[module(name = "...")]` sets the module name and `#[module(provider)]` exposes the
/// struct's `Provider` impl.
#[proc_macro_derive(Module, attributes(bind, module))]
pub fn derive_module(input: TokenStream) -> TokenStream {
    module::derive_module_impl(input)
}
