//! Shared machinery for rendering synthesized closures.
//!
//! Every decision value renders into a pure, capture-free Rust closure over
//! the runtime key. The closures return marker types from the `shroud`
//! runtime crate; [`RuntimeConfig`] carries the path under which generated
//! code can name that crate, since generated crates may re-export or rename
//! it.

use proc_macro2::TokenStream;
use quote::quote;

/// Where generated code finds the `shroud` runtime crate.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    crate_path: TokenStream,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            crate_path: quote!(::shroud),
        }
    }
}

impl RuntimeConfig {
    /// Uses a custom runtime crate path (e.g. a re-export in the generated
    /// crate).
    pub fn new(crate_path: TokenStream) -> Self {
        Self { crate_path }
    }

    /// Path tokens for the runtime crate root.
    pub fn crate_path(&self) -> &TokenStream {
        &self.crate_path
    }
}

/// Renders membership of `value` in a fixed string set.
///
/// `matches!` has no empty-pattern form, so the empty set renders as a plain
/// `false`.
pub(crate) fn string_set_match(value: &TokenStream, keys: &[String]) -> TokenStream {
    if keys.is_empty() {
        quote!(false)
    } else {
        quote!(matches!(#value, #(#keys)|*))
    }
}
