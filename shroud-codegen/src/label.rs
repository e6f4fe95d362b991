//! URI label sensitivity: decision value, resolver, and closure synthesis.
//!
//! Label-bound members are matched to their segment positions in the URI
//! pattern; the synthesized closure answers, for a 0-based segment index,
//! whether that segment's runtime value must be redacted. Index order
//! follows the locator's post-order rule over label-bound members, mapped to
//! pattern positions.

use proc_macro2::TokenStream;
use quote::quote;
use tracing::debug;

use crate::analyzer::AnalysisError;
use crate::bound::find_sensitive_bound;
use crate::model::{Model, ShapeId, UriPattern};

/// Which URI path segments of a request redact.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSensitivity {
    label_indexes: Vec<usize>,
}

impl LabelSensitivity {
    /// Segment indexes of sensitive labels, in locator order.
    pub fn label_indexes(&self) -> &[usize] {
        &self.label_indexes
    }

    /// Whether any path segment redacts at all.
    pub fn has_redactions(&self) -> bool {
        !self.label_indexes.is_empty()
    }

    /// The decision for one runtime segment position.
    ///
    /// This is the in-process form of [`closure`](Self::closure); both
    /// implement the identical index-to-bool mapping.
    pub fn evaluate(&self, index: usize) -> bool {
        self.label_indexes.contains(&index)
    }

    /// Renders the runtime predicate embedded into generated code.
    ///
    /// Labels need no marker type: a segment either redacts wholly or not
    /// at all, so the closure returns a plain `bool`.
    pub fn closure(&self) -> TokenStream {
        if self.label_indexes.is_empty() {
            quote! { |_: usize| false }
        } else {
            let indexes = &self.label_indexes;
            quote! { |index: usize| matches!(index, #(#indexes)|*) }
        }
    }
}

/// Segment positions of labels bound to sensitive members.
///
/// Order follows the locator's post-order rule applied over label-bound
/// members, then mapped to pattern positions. Labels without a bound member
/// of the same name are skipped.
pub(crate) fn find_uri_label_indexes(
    model: &Model,
    pattern: &UriPattern,
    root: &ShapeId,
) -> Result<Vec<usize>, AnalysisError> {
    let bound = find_sensitive_bound(model, root, |m| m.traits().http_label())?;
    let mut indexes = Vec::new();
    for member in bound {
        let position = pattern
            .segments()
            .iter()
            .position(|segment| segment.label_name() == Some(member.name()));
        if let Some(position) = position {
            indexes.push(position);
        }
    }
    debug!(root = %root, ?indexes, "resolved sensitive label indexes");
    Ok(indexes)
}

/// Resolves label sensitivity for the structure rooted at `root`.
pub(crate) fn find_label_sensitivity(
    model: &Model,
    pattern: &UriPattern,
    root: &ShapeId,
) -> Result<LabelSensitivity, AnalysisError> {
    Ok(LabelSensitivity {
        label_indexes: find_uri_label_indexes(model, pattern, root)?,
    })
}
