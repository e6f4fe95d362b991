//! Per-operation analysis entry points and aggregates.
//!
//! One [`SensitivityAnalyzer`] wraps one operation of a model and answers
//! the per-binding-kind questions; [`analyze_service`] runs every operation
//! in sorted id order. Analysis is purely functional over the immutable
//! model: operations are independent of one another and of evaluation
//! order, so callers are free to fan them out across threads.

use thiserror::Error;
use tracing::debug;

use crate::headers::{find_header_sensitivity, HeaderSensitivity};
use crate::label::{find_label_sensitivity, find_uri_label_indexes, LabelSensitivity};
use crate::model::{GreedyLabel, Model, Operation, Shape, ShapeId, UriPattern};
use crate::query::{find_query_sensitivity, QuerySensitivity};
use crate::status::{find_response_code_sensitivity, ResponseCodeSensitivity};

/// Internal-consistency fault surfaced during analysis.
///
/// These conditions are model errors that upstream validation owns; the
/// analyzer still refuses to continue past them, because silently picking
/// one of several candidates would produce incorrect, undetectable
/// redaction gaps.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// A reference to a shape the model does not define.
    #[error("shape `{0}` is not defined in the model")]
    UnresolvedShape(ShapeId),
    /// A shape of the wrong kind at a binding site.
    #[error("expected shape `{id}` to be a {expected}")]
    UnexpectedShapeKind {
        /// The offending shape.
        id: ShapeId,
        /// The kind the binding requires.
        expected: &'static str,
    },
    /// More than one dynamic-map binding reachable from one root structure.
    #[error("structure `{structure}` reaches more than one member bound with `{binding}`")]
    DuplicateDynamicBinding {
        /// The root structure of the traversal.
        structure: ShapeId,
        /// The binding trait name.
        binding: &'static str,
    },
}

/// Sensitivity decisions for the request side of one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestSensitivity {
    /// URI label decision.
    pub labels: LabelSensitivity,
    /// Greedy label position and trailing literal, when the pattern has one.
    pub greedy_label: Option<GreedyLabel>,
    /// Query string decision.
    pub query: QuerySensitivity,
    /// Request header decision.
    pub headers: HeaderSensitivity,
}

impl RequestSensitivity {
    /// Whether anything on the request side redacts.
    pub fn has_redactions(&self) -> bool {
        self.labels.has_redactions()
            || self.query.has_redactions()
            || self.headers.has_redactions()
    }
}

/// Sensitivity decisions for the response side of one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseSensitivity {
    /// Response header decision.
    pub headers: HeaderSensitivity,
    /// Status code decision.
    pub response_code: ResponseCodeSensitivity,
}

impl ResponseSensitivity {
    /// Whether anything on the response side redacts.
    pub fn has_redactions(&self) -> bool {
        self.headers.has_redactions() || self.response_code.has_redactions()
    }
}

/// All sensitivity decisions of one operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationSensitivity {
    /// The analyzed operation.
    pub operation: ShapeId,
    /// Request-side decisions.
    pub request: RequestSensitivity,
    /// Response-side decisions.
    pub response: ResponseSensitivity,
}

impl OperationSensitivity {
    /// Whether the operation redacts anything at all.
    ///
    /// Generators skip the entire redaction call path when false.
    pub fn has_redactions(&self) -> bool {
        self.request.has_redactions() || self.response.has_redactions()
    }
}

/// The sensitivity analysis for one operation of a model.
#[derive(Clone, Copy, Debug)]
pub struct SensitivityAnalyzer<'a> {
    model: &'a Model,
    operation: &'a Operation,
}

impl<'a> SensitivityAnalyzer<'a> {
    /// Creates an analyzer over one operation.
    pub fn new(model: &'a Model, operation: &'a Operation) -> Self {
        Self { model, operation }
    }

    /// The operation's input structure, if it declares one.
    pub fn input(&self) -> Result<Option<&'a Shape>, AnalysisError> {
        self.bound_structure(self.operation.input())
    }

    /// The operation's output structure, if it declares one.
    pub fn output(&self) -> Result<Option<&'a Shape>, AnalysisError> {
        self.bound_structure(self.operation.output())
    }

    fn bound_structure(&self, id: Option<&ShapeId>) -> Result<Option<&'a Shape>, AnalysisError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let shape = self
            .model
            .shape(id)
            .ok_or_else(|| AnalysisError::UnresolvedShape(id.clone()))?;
        if !shape.is_structure() {
            return Err(AnalysisError::UnexpectedShapeKind {
                id: id.clone(),
                expected: "structure",
            });
        }
        Ok(Some(shape))
    }

    /// Header sensitivity for the structure rooted at `root`.
    pub fn find_header_sensitivity(
        &self,
        root: &ShapeId,
    ) -> Result<HeaderSensitivity, AnalysisError> {
        find_header_sensitivity(self.model, root)
    }

    /// Query sensitivity for the structure rooted at `root`.
    pub fn find_query_sensitivity(&self, root: &ShapeId) -> Result<QuerySensitivity, AnalysisError> {
        find_query_sensitivity(self.model, root)
    }

    /// Label sensitivity for `pattern` against the structure at `root`.
    pub fn find_label_sensitivity(
        &self,
        pattern: &UriPattern,
        root: &ShapeId,
    ) -> Result<LabelSensitivity, AnalysisError> {
        find_label_sensitivity(self.model, pattern, root)
    }

    /// Segment positions of sensitive labels, in locator order.
    pub fn find_uri_label_indexes(
        &self,
        pattern: &UriPattern,
        root: &ShapeId,
    ) -> Result<Vec<usize>, AnalysisError> {
        find_uri_label_indexes(self.model, pattern, root)
    }

    /// Status code sensitivity for the structure rooted at `root`.
    pub fn find_response_code_sensitivity(
        &self,
        root: &ShapeId,
    ) -> Result<ResponseCodeSensitivity, AnalysisError> {
        find_response_code_sensitivity(self.model, root)
    }

    /// All request-side decisions of the operation.
    ///
    /// Operations without an input structure, or without an HTTP binding
    /// for the label decision, fall back to empty decisions that report no
    /// redactions.
    pub fn request_sensitivity(&self) -> Result<RequestSensitivity, AnalysisError> {
        let Some(input) = self.input()? else {
            return Ok(RequestSensitivity::default());
        };
        let root = input.id();
        let (labels, greedy_label) = match self.operation.http() {
            Some(http) => (
                self.find_label_sensitivity(http.uri(), root)?,
                http.uri().greedy_label(),
            ),
            None => (LabelSensitivity::default(), None),
        };
        Ok(RequestSensitivity {
            labels,
            greedy_label,
            query: self.find_query_sensitivity(root)?,
            headers: self.find_header_sensitivity(root)?,
        })
    }

    /// All response-side decisions of the operation.
    pub fn response_sensitivity(&self) -> Result<ResponseSensitivity, AnalysisError> {
        let Some(output) = self.output()? else {
            return Ok(ResponseSensitivity::default());
        };
        let root = output.id();
        Ok(ResponseSensitivity {
            headers: self.find_header_sensitivity(root)?,
            response_code: self.find_response_code_sensitivity(root)?,
        })
    }

    /// Both sides of the operation.
    pub fn operation_sensitivity(&self) -> Result<OperationSensitivity, AnalysisError> {
        let sensitivity = OperationSensitivity {
            operation: self.operation.id().clone(),
            request: self.request_sensitivity()?,
            response: self.response_sensitivity()?,
        };
        debug!(
            operation = %sensitivity.operation,
            has_redactions = sensitivity.has_redactions(),
            "analyzed operation"
        );
        Ok(sensitivity)
    }
}

/// Analyzes every operation of the model, in sorted id order.
///
/// Results are independent per operation; callers needing parallelism can
/// run one [`SensitivityAnalyzer`] per operation instead.
pub fn analyze_service(model: &Model) -> Result<Vec<OperationSensitivity>, AnalysisError> {
    model
        .operations()
        .map(|operation| SensitivityAnalyzer::new(model, operation).operation_sensitivity())
        .collect()
}
