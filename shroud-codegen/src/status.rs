//! Response status code sensitivity.
//!
//! The simplest binding kind: whether the operation's status code is
//! sensitive is a static fact, not a per-key runtime decision, so no closure
//! is synthesized. The generator consults the bool directly when emitting
//! the response instrumentation.

use tracing::debug;

use crate::analyzer::AnalysisError;
use crate::bound::find_sensitive_bound;
use crate::model::{Model, ShapeId};

/// Whether the operation's response status code redacts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResponseCodeSensitivity {
    sensitive: bool,
}

impl ResponseCodeSensitivity {
    /// Whether the status code is sensitive.
    pub fn is_sensitive(self) -> bool {
        self.sensitive
    }

    /// Same as [`is_sensitive`](Self::is_sensitive); named for symmetry with
    /// the other decisions' skip hook.
    pub fn has_redactions(self) -> bool {
        self.sensitive
    }
}

/// Resolves status code sensitivity for the structure rooted at `root`.
pub(crate) fn find_response_code_sensitivity(
    model: &Model,
    root: &ShapeId,
) -> Result<ResponseCodeSensitivity, AnalysisError> {
    let bound = find_sensitive_bound(model, root, |m| m.traits().http_response_code())?;
    let sensitivity = ResponseCodeSensitivity {
        sensitive: !bound.is_empty(),
    };
    debug!(root = %root, sensitive = sensitivity.sensitive, "resolved response code sensitivity");
    Ok(sensitivity)
}
