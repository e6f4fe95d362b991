//! Protocol sensitivity analysis for generated service instrumentation.
//!
//! A service code generator consumes an abstract shape model (structures,
//! members, operations, and the traits attached to them) and emits clients
//! and servers for that service. Before the generated server can log
//! requests and responses safely, something has to decide which HTTP-bound
//! pieces of each operation (URI labels, query parameters, headers, the
//! status code) may carry sensitive data. That decision pass lives here.
//!
//! The crate separates:
//! - **Model**: the consumed shape graph and URI patterns ([`model`]).
//! - **Analysis**: taint propagation from `sensitive` traits to concrete
//!   HTTP bindings ([`SensitivityAnalyzer`] and the per-binding decisions).
//! - **Synthesis**: rendering each decision into a pure Rust closure over
//!   the runtime key, embedded into generated code and returning the marker
//!   types from the `shroud` runtime crate.
//!
//! Key rules:
//! - Sensitivity originates only from the `sensitive` trait and propagates
//!   through nested structures and map key/value types.
//! - Traversal is depth-first post-order over structure members in
//!   declaration order; nested matches are reported before the enclosing
//!   structure's own matches.
//! - Recursive shapes terminate via an on-path identity set; re-entry stops
//!   the descent and is not an error.
//! - Model-invariant violations (two dynamic query maps, a prefix-header
//!   member that is not a map) fail fast as typed errors; the analyzer never
//!   silently picks one candidate.
//!
//! What this crate does not do:
//! - perform redaction (the generated logging layer does, using `shroud`)
//! - parse an interface-description language into the model
//! - generate (de)serialization or builder code

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
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::cargo_common_metadata
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Module declarations
pub mod model;

mod analyzer;
mod bound;
mod headers;
mod label;
mod query;
mod render;
mod status;

// Re-exports
pub use analyzer::{
    analyze_service, AnalysisError, OperationSensitivity, RequestSensitivity, ResponseSensitivity,
    SensitivityAnalyzer,
};
pub use headers::HeaderSensitivity;
pub use label::LabelSensitivity;
pub use query::QuerySensitivity;
pub use render::RuntimeConfig;
pub use status::ResponseCodeSensitivity;
