//! Runtime support for redaction-aware service instrumentation.
//!
//! Generated servers decide *where* redaction applies at code-generation time;
//! at serving time the generated logging layer calls small, pure closures to
//! decide what to hide for each concrete header name, query key, or URI
//! segment. This crate defines the vocabulary those closures speak:
//!
//! - **Markers**: the decision records a closure returns for a runtime key
//!   ([`HeaderMarker`], [`QueryMarker`]).
//! - **Sensitive values**: the [`Sensitive`] wrapper, which formats as
//!   [`REDACTED_PLACEHOLDER`] so sensitive data cannot leak through `Display`
//!   or `Debug` in log output.
//!
//! What this crate does not do:
//! - perform I/O or logging
//! - decide which bindings are sensitive (that is `shroud-codegen`'s job)
//!
//! ## Features
//!
//! - `unredacted`: make [`Sensitive`] print its inner value. Intended for
//!   local debugging of generated services only.
//! - `slog`: emit [`Sensitive`] values as structured `slog` log fields.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::cargo_common_metadata
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Module declarations
mod markers;
mod sensitive;
#[cfg(feature = "slog")]
pub mod slog;

// Re-exports
pub use markers::{HeaderMarker, QueryMarker};
pub use sensitive::{Sensitive, REDACTED_PLACEHOLDER};
