//! Header sensitivity: decision value, resolver, and closure synthesis.
//!
//! Two sources feed header redaction: members bound to a literal header name
//! via `httpHeader`, and the at-most-one `httpPrefixHeaders` map whose
//! runtime keys share a fixed name prefix. For the prefix map, key and value
//! sensitivity are fully independent booleans: a map can expose values while
//! hiding the key suffix after the prefix, or the reverse. That independence
//! is a confirmed contract, not an accident of one model.

use proc_macro2::TokenStream;
use quote::quote;
use shroud::HeaderMarker;
use tracing::debug;

use crate::analyzer::AnalysisError;
use crate::bound::{find_dynamic_map, find_sensitive_bound};
use crate::model::{Model, ShapeId};
use crate::render::{string_set_match, RuntimeConfig};

/// Which headers of a request or response redact, and how.
///
/// The variant records whether the prefix map's *values* are sensitive,
/// because that is the one bit the synthesized closure cannot recover from
/// the header name alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderSensitivity {
    /// No prefix map, or a prefix map whose values are not sensitive.
    NotSensitiveMapValue {
        /// Literal names of sensitive bound headers, in discovery order.
        header_keys: Vec<String>,
        /// The prefix of the prefix-headers map, recorded only when the
        /// map *key* is sensitive; the closure has no other use for it.
        prefix_header: Option<String>,
    },
    /// A prefix map whose values are sensitive.
    SensitiveMapValue {
        /// Literal names of sensitive bound headers, in discovery order.
        header_keys: Vec<String>,
        /// The prefix of the prefix-headers map.
        prefix_header: String,
        /// Whether the map key is sensitive as well.
        key_sensitive: bool,
    },
}

impl Default for HeaderSensitivity {
    fn default() -> Self {
        Self::NotSensitiveMapValue {
            header_keys: Vec::new(),
            prefix_header: None,
        }
    }
}

impl HeaderSensitivity {
    /// Literal sensitive header names.
    pub fn header_keys(&self) -> &[String] {
        match self {
            Self::NotSensitiveMapValue { header_keys, .. }
            | Self::SensitiveMapValue { header_keys, .. } => header_keys,
        }
    }

    /// Whether any header of this operation redacts at all.
    ///
    /// Generators skip emitting the redaction call path when false.
    pub fn has_redactions(&self) -> bool {
        match self {
            Self::NotSensitiveMapValue {
                header_keys,
                prefix_header,
            } => !header_keys.is_empty() || prefix_header.is_some(),
            Self::SensitiveMapValue { .. } => true,
        }
    }

    /// The decision for one runtime header name.
    ///
    /// This is the in-process form of [`closure`](Self::closure); both
    /// implement the identical name-to-marker mapping.
    pub fn evaluate(&self, name: &str) -> HeaderMarker {
        match self {
            Self::NotSensitiveMapValue {
                header_keys,
                prefix_header,
            } => HeaderMarker {
                value: header_keys.iter().any(|key| key == name),
                key_suffix: prefix_header
                    .as_deref()
                    .filter(|prefix| name.starts_with(prefix))
                    .map(str::len),
            },
            Self::SensitiveMapValue {
                header_keys,
                prefix_header,
                key_sensitive,
            } => {
                let matches_prefix = name.starts_with(prefix_header.as_str());
                HeaderMarker {
                    value: header_keys.iter().any(|key| key == name) || matches_prefix,
                    key_suffix: (matches_prefix && *key_sensitive)
                        .then(|| prefix_header.len()),
                }
            }
        }
    }

    /// Renders the runtime predicate embedded into generated code.
    ///
    /// The output is a pure, allocation-free closure expression from a
    /// header name to a `HeaderMarker`.
    pub fn closure(&self, runtime: &RuntimeConfig) -> TokenStream {
        let root = runtime.crate_path();
        match self {
            Self::NotSensitiveMapValue {
                header_keys,
                prefix_header,
            } => {
                let value = string_set_match(&quote!(name), header_keys);
                let key_suffix = match prefix_header {
                    Some(prefix) => {
                        let suffix = prefix.len();
                        quote! {
                            if name.starts_with(#prefix) { Some(#suffix) } else { None }
                        }
                    }
                    None => quote!(None),
                };
                quote! {
                    |name: &str| {
                        let value = #value;
                        let key_suffix = #key_suffix;
                        #root::HeaderMarker { value, key_suffix }
                    }
                }
            }
            Self::SensitiveMapValue {
                header_keys,
                prefix_header,
                key_sensitive,
            } => {
                let value = if header_keys.is_empty() {
                    quote!(matches_prefix)
                } else {
                    let named = string_set_match(&quote!(name), header_keys);
                    quote!(#named || matches_prefix)
                };
                let key_suffix = if *key_sensitive {
                    let suffix = prefix_header.len();
                    quote! {
                        if matches_prefix { Some(#suffix) } else { None }
                    }
                } else {
                    quote!(None)
                };
                quote! {
                    |name: &str| {
                        let matches_prefix = name.starts_with(#prefix_header);
                        let value = #value;
                        let key_suffix = #key_suffix;
                        #root::HeaderMarker { value, key_suffix }
                    }
                }
            }
        }
    }
}

/// Resolves header sensitivity for the structure rooted at `root`.
pub(crate) fn find_header_sensitivity(
    model: &Model,
    root: &ShapeId,
) -> Result<HeaderSensitivity, AnalysisError> {
    let bound = find_sensitive_bound(model, root, |m| m.traits().http_header().is_some())?;
    let mut header_keys: Vec<String> = Vec::new();
    for member in bound {
        if let Some(name) = member.traits().http_header() {
            if !header_keys.iter().any(|key| key == name) {
                header_keys.push(name.to_string());
            }
        }
    }

    let map = find_dynamic_map(model, root, "httpPrefixHeaders", |m| {
        m.traits().http_prefix_headers().map(str::to_string)
    })?;

    let sensitivity = match map {
        Some(map) if map.value_sensitive => HeaderSensitivity::SensitiveMapValue {
            header_keys,
            prefix_header: map.payload,
            key_sensitive: map.key_sensitive,
        },
        Some(map) => HeaderSensitivity::NotSensitiveMapValue {
            header_keys,
            prefix_header: map.key_sensitive.then_some(map.payload),
        },
        None => HeaderSensitivity::NotSensitiveMapValue {
            header_keys,
            prefix_header: None,
        },
    };
    debug!(root = %root, ?sensitivity, "resolved header sensitivity");
    Ok(sensitivity)
}
