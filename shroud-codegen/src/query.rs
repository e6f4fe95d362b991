//! Query string sensitivity: decision value, resolver, and closure synthesis.
//!
//! Individually named `httpQuery` bindings contribute a fixed key set; the
//! at-most-one `httpQueryParams` map turns the query string into a wildcard
//! whose keys and values take their sensitivity from the map's key and value
//! shapes (or from any enclosing sensitive structure).

use proc_macro2::TokenStream;
use quote::quote;
use shroud::QueryMarker;
use tracing::debug;

use crate::analyzer::AnalysisError;
use crate::bound::{find_dynamic_map, find_sensitive_bound};
use crate::model::{Model, ShapeId};
use crate::render::{string_set_match, RuntimeConfig};

/// Which query string pairs of a request redact, and how.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuerySensitivity {
    /// No wildcard map, or a wildcard map whose values are not sensitive.
    NotSensitiveMapValue {
        /// Keys of sensitive named query bindings, in discovery order.
        query_keys: Vec<String>,
        /// Whether every runtime key is sensitive (wildcard map with a
        /// sensitive key shape or enclosing structure).
        all_keys_sensitive: bool,
    },
    /// A wildcard map whose values are sensitive: every value redacts.
    SensitiveMapValue {
        /// Whether every runtime key is sensitive as well.
        all_keys_sensitive: bool,
    },
}

impl Default for QuerySensitivity {
    fn default() -> Self {
        Self::NotSensitiveMapValue {
            query_keys: Vec::new(),
            all_keys_sensitive: false,
        }
    }
}

impl QuerySensitivity {
    /// Whether every runtime query key is sensitive.
    pub fn all_keys_sensitive(&self) -> bool {
        match self {
            Self::NotSensitiveMapValue {
                all_keys_sensitive, ..
            }
            | Self::SensitiveMapValue { all_keys_sensitive } => *all_keys_sensitive,
        }
    }

    /// Whether any part of the query string redacts at all.
    pub fn has_redactions(&self) -> bool {
        match self {
            Self::NotSensitiveMapValue {
                query_keys,
                all_keys_sensitive,
            } => *all_keys_sensitive || !query_keys.is_empty(),
            Self::SensitiveMapValue { .. } => true,
        }
    }

    /// The decision for one runtime query key.
    ///
    /// This is the in-process form of [`closure`](Self::closure); both
    /// implement the identical key-to-marker mapping.
    pub fn evaluate(&self, key: &str) -> QueryMarker {
        match self {
            Self::NotSensitiveMapValue {
                query_keys,
                all_keys_sensitive,
            } => QueryMarker {
                key: *all_keys_sensitive,
                value: query_keys.iter().any(|bound| bound == key),
            },
            Self::SensitiveMapValue { all_keys_sensitive } => QueryMarker {
                key: *all_keys_sensitive,
                value: true,
            },
        }
    }

    /// Renders the runtime predicate embedded into generated code.
    pub fn closure(&self, runtime: &RuntimeConfig) -> TokenStream {
        let root = runtime.crate_path();
        match self {
            Self::NotSensitiveMapValue {
                query_keys,
                all_keys_sensitive,
            } => {
                let value = string_set_match(&quote!(name), query_keys);
                quote! {
                    |name: &str| #root::QueryMarker { key: #all_keys_sensitive, value: #value }
                }
            }
            Self::SensitiveMapValue { all_keys_sensitive } => quote! {
                |name: &str| #root::QueryMarker { key: #all_keys_sensitive, value: true }
            },
        }
    }
}

/// Resolves query sensitivity for the structure rooted at `root`.
pub(crate) fn find_query_sensitivity(
    model: &Model,
    root: &ShapeId,
) -> Result<QuerySensitivity, AnalysisError> {
    let bound = find_sensitive_bound(model, root, |m| m.traits().http_query().is_some())?;
    let mut query_keys: Vec<String> = Vec::new();
    for member in bound {
        if let Some(name) = member.traits().http_query() {
            if !query_keys.iter().any(|key| key == name) {
                query_keys.push(name.to_string());
            }
        }
    }

    let map = find_dynamic_map(model, root, "httpQueryParams", |m| {
        m.traits().http_query_params().then_some(())
    })?;

    let sensitivity = match map {
        Some(map) if map.value_sensitive => QuerySensitivity::SensitiveMapValue {
            all_keys_sensitive: map.key_sensitive,
        },
        Some(map) => QuerySensitivity::NotSensitiveMapValue {
            query_keys,
            all_keys_sensitive: map.key_sensitive,
        },
        None => QuerySensitivity::NotSensitiveMapValue {
            query_keys,
            all_keys_sensitive: false,
        },
    };
    debug!(root = %root, ?sensitivity, "resolved query sensitivity");
    Ok(sensitivity)
}
