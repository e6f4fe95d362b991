//! The consumed shape graph.
//!
//! This module defines the immutable service model the analyzer walks:
//! shapes identified by qualified name, their trait annotations, structure
//! members in declaration order, and the operations binding structures to
//! HTTP. The model-loading collaborator assembles it through
//! [`ModelBuilder`], which checks referential integrity once at
//! [`ModelBuilder::build`]; after that the graph is read-only and analysis
//! never mutates it.
//!
//! Declaration order of structure members is significant: the analyzer's
//! traversal order, and therefore the order of reported bindings, follows it.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

mod uri;

pub use uri::{GreedyLabel, Segment, UriPattern, UriPatternError};

/// Qualified name identifying a shape, e.g. `example.service#Input`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(String);

impl ShapeId {
    /// Creates a shape id from a qualified name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The qualified name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ShapeId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// A named annotation attached to a shape or member.
///
/// Only the vocabulary the sensitivity analysis consumes is modeled;
/// `Required` is carried because real models use it pervasively, even though
/// the analyzer ignores it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeTrait {
    /// The shape or member carries privacy-sensitive data.
    Sensitive,
    /// The member must be present. Ignored by the analysis.
    Required,
    /// The member is bound to a URI label of the same name.
    HttpLabel,
    /// The member is bound to the named header.
    HttpHeader(String),
    /// The member is a map of headers sharing the given name prefix.
    HttpPrefixHeaders(String),
    /// The member is bound to the named query parameter.
    HttpQuery(String),
    /// The member is a map of arbitrary query parameters.
    HttpQueryParams,
    /// The member carries the HTTP response status code.
    HttpResponseCode,
}

/// The traits attached to one shape or member.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraitSet(Vec<ShapeTrait>);

impl TraitSet {
    /// An empty trait set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a trait.
    pub fn with(mut self, added: ShapeTrait) -> Self {
        self.0.push(added);
        self
    }

    /// Whether `sensitive` is present.
    pub fn sensitive(&self) -> bool {
        self.0.contains(&ShapeTrait::Sensitive)
    }

    /// Whether `httpLabel` is present.
    pub fn http_label(&self) -> bool {
        self.0.contains(&ShapeTrait::HttpLabel)
    }

    /// The `httpHeader` name, if bound.
    pub fn http_header(&self) -> Option<&str> {
        self.0.iter().find_map(|t| match t {
            ShapeTrait::HttpHeader(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// The `httpPrefixHeaders` prefix, if bound.
    pub fn http_prefix_headers(&self) -> Option<&str> {
        self.0.iter().find_map(|t| match t {
            ShapeTrait::HttpPrefixHeaders(prefix) => Some(prefix.as_str()),
            _ => None,
        })
    }

    /// The `httpQuery` key, if bound.
    pub fn http_query(&self) -> Option<&str> {
        self.0.iter().find_map(|t| match t {
            ShapeTrait::HttpQuery(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Whether `httpQueryParams` is present.
    pub fn http_query_params(&self) -> bool {
        self.0.contains(&ShapeTrait::HttpQueryParams)
    }

    /// Whether `httpResponseCode` is present.
    pub fn http_response_code(&self) -> bool {
        self.0.contains(&ShapeTrait::HttpResponseCode)
    }
}

impl FromIterator<ShapeTrait> for TraitSet {
    fn from_iter<I: IntoIterator<Item = ShapeTrait>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[ShapeTrait; N]> for TraitSet {
    fn from(traits: [ShapeTrait; N]) -> Self {
        traits.into_iter().collect()
    }
}

/// A member of a structure: a named, trait-annotated edge to a target shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    name: String,
    target: ShapeId,
    traits: TraitSet,
}

impl Member {
    /// Creates a member targeting the given shape.
    pub fn new(name: impl Into<String>, target: impl Into<ShapeId>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            traits: TraitSet::new(),
        }
    }

    /// Adds a trait to the member.
    pub fn with_trait(mut self, added: ShapeTrait) -> Self {
        self.traits = self.traits.with(added);
        self
    }

    /// The member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The target shape id.
    pub fn target(&self) -> &ShapeId {
        &self.target
    }

    /// The member's own traits.
    pub fn traits(&self) -> &TraitSet {
        &self.traits
    }
}

/// What kind of node a shape is, with the kind-specific edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    /// A structure with members in declaration order.
    Structure {
        /// Members in declaration order.
        members: Vec<Member>,
    },
    /// A homogeneous list.
    List {
        /// Element shape.
        member: ShapeId,
    },
    /// A map with exactly one key shape and one value shape.
    Map {
        /// Key shape.
        key: ShapeId,
        /// Value shape.
        value: ShapeId,
    },
    /// A closed set of named values.
    Enum,
    /// A scalar leaf (string, integer, boolean, ...).
    Primitive,
}

/// A node in the shape graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    id: ShapeId,
    traits: TraitSet,
    kind: ShapeKind,
}

impl Shape {
    /// Creates a structure shape with members in declaration order.
    pub fn structure(id: impl Into<ShapeId>, members: impl IntoIterator<Item = Member>) -> Self {
        Self {
            id: id.into(),
            traits: TraitSet::new(),
            kind: ShapeKind::Structure {
                members: members.into_iter().collect(),
            },
        }
    }

    /// Creates a list shape.
    pub fn list(id: impl Into<ShapeId>, member: impl Into<ShapeId>) -> Self {
        Self {
            id: id.into(),
            traits: TraitSet::new(),
            kind: ShapeKind::List {
                member: member.into(),
            },
        }
    }

    /// Creates a map shape.
    pub fn map(
        id: impl Into<ShapeId>,
        key: impl Into<ShapeId>,
        value: impl Into<ShapeId>,
    ) -> Self {
        Self {
            id: id.into(),
            traits: TraitSet::new(),
            kind: ShapeKind::Map {
                key: key.into(),
                value: value.into(),
            },
        }
    }

    /// Creates an enum shape.
    pub fn enumeration(id: impl Into<ShapeId>) -> Self {
        Self {
            id: id.into(),
            traits: TraitSet::new(),
            kind: ShapeKind::Enum,
        }
    }

    /// Creates a primitive shape.
    pub fn primitive(id: impl Into<ShapeId>) -> Self {
        Self {
            id: id.into(),
            traits: TraitSet::new(),
            kind: ShapeKind::Primitive,
        }
    }

    /// Replaces the shape's traits.
    pub fn with_traits(mut self, traits: impl Into<TraitSet>) -> Self {
        self.traits = traits.into();
        self
    }

    /// The shape id.
    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    /// The shape's traits.
    pub fn traits(&self) -> &TraitSet {
        &self.traits
    }

    /// The shape's kind and edges.
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// The structure members, or an empty slice for non-structures.
    pub fn members(&self) -> &[Member] {
        match &self.kind {
            ShapeKind::Structure { members } => members,
            _ => &[],
        }
    }

    /// Whether this shape is a structure.
    pub fn is_structure(&self) -> bool {
        matches!(self.kind, ShapeKind::Structure { .. })
    }

    /// The map key and value shapes, if this is a map.
    pub fn as_map(&self) -> Option<(&ShapeId, &ShapeId)> {
        match &self.kind {
            ShapeKind::Map { key, value } => Some((key, value)),
            _ => None,
        }
    }
}

/// HTTP binding of an operation: method plus URI pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpBinding {
    method: String,
    uri: UriPattern,
}

impl HttpBinding {
    /// Creates an HTTP binding from an already-parsed pattern.
    pub fn new(method: impl Into<String>, uri: UriPattern) -> Self {
        Self {
            method: method.into(),
            uri,
        }
    }

    /// The HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The URI pattern.
    pub fn uri(&self) -> &UriPattern {
        &self.uri
    }
}

/// A service operation with optional input/output structures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    id: ShapeId,
    input: Option<ShapeId>,
    output: Option<ShapeId>,
    http: Option<HttpBinding>,
}

impl Operation {
    /// Creates an operation with no bindings.
    pub fn new(id: impl Into<ShapeId>) -> Self {
        Self {
            id: id.into(),
            input: None,
            output: None,
            http: None,
        }
    }

    /// Sets the input structure.
    pub fn with_input(mut self, input: impl Into<ShapeId>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Sets the output structure.
    pub fn with_output(mut self, output: impl Into<ShapeId>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Sets the HTTP binding.
    pub fn with_http(mut self, http: HttpBinding) -> Self {
        self.http = Some(http);
        self
    }

    /// The operation id.
    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    /// The input structure id, if any.
    pub fn input(&self) -> Option<&ShapeId> {
        self.input.as_ref()
    }

    /// The output structure id, if any.
    pub fn output(&self) -> Option<&ShapeId> {
        self.output.as_ref()
    }

    /// The HTTP binding, if any.
    pub fn http(&self) -> Option<&HttpBinding> {
        self.http.as_ref()
    }
}

/// Referential-integrity failure while assembling a model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Two shapes share one id.
    #[error("duplicate shape id `{0}`")]
    DuplicateShape(ShapeId),
    /// Two operations share one id.
    #[error("duplicate operation id `{0}`")]
    DuplicateOperation(ShapeId),
    /// A structure member targets a shape the model does not define.
    #[error("member `{member}` of `{shape}` targets undefined shape `{target}`")]
    UnresolvedMemberTarget {
        /// The structure declaring the member.
        shape: ShapeId,
        /// The member name.
        member: String,
        /// The missing target.
        target: ShapeId,
    },
    /// A list or map edge targets a shape the model does not define.
    #[error("shape `{shape}` references undefined shape `{target}`")]
    UnresolvedShapeTarget {
        /// The referencing shape.
        shape: ShapeId,
        /// The missing target.
        target: ShapeId,
    },
    /// An operation input or output targets a shape the model does not define.
    #[error("operation `{operation}` references undefined shape `{target}`")]
    UnresolvedOperationTarget {
        /// The operation.
        operation: ShapeId,
        /// The missing target.
        target: ShapeId,
    },
    /// An operation input or output resolves to a non-structure shape.
    #[error("operation `{operation}` input/output `{target}` is not a structure")]
    OperationTargetNotStructure {
        /// The operation.
        operation: ShapeId,
        /// The offending target.
        target: ShapeId,
    },
}

/// The immutable shape graph plus the service's operations.
#[derive(Clone, Debug, Default)]
pub struct Model {
    shapes: BTreeMap<ShapeId, Shape>,
    operations: BTreeMap<ShapeId, Operation>,
}

impl Model {
    /// Starts assembling a model.
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    /// Looks up a shape by id.
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Looks up an operation by id.
    pub fn operation(&self, id: &ShapeId) -> Option<&Operation> {
        self.operations.get(id)
    }

    /// All operations, in sorted id order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }
}

/// Accumulates shapes and operations, then validates referential integrity.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    shapes: Vec<Shape>,
    operations: Vec<Operation>,
}

impl ModelBuilder {
    /// Adds a shape.
    #[must_use]
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Adds an operation.
    #[must_use]
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Validates the graph and freezes it.
    ///
    /// Every member, list, map, and operation edge must resolve to a defined
    /// shape, and operation inputs/outputs must be structures. Cycles are
    /// permitted; they are the analyzer's designed termination case, not an
    /// integrity violation.
    pub fn build(self) -> Result<Model, ModelError> {
        let mut shapes = BTreeMap::new();
        for shape in self.shapes {
            let id = shape.id().clone();
            if shapes.insert(id.clone(), shape).is_some() {
                return Err(ModelError::DuplicateShape(id));
            }
        }

        for shape in shapes.values() {
            match shape.kind() {
                ShapeKind::Structure { members } => {
                    for member in members {
                        if !shapes.contains_key(member.target()) {
                            return Err(ModelError::UnresolvedMemberTarget {
                                shape: shape.id().clone(),
                                member: member.name().to_string(),
                                target: member.target().clone(),
                            });
                        }
                    }
                }
                ShapeKind::List { member } => {
                    if !shapes.contains_key(member) {
                        return Err(ModelError::UnresolvedShapeTarget {
                            shape: shape.id().clone(),
                            target: member.clone(),
                        });
                    }
                }
                ShapeKind::Map { key, value } => {
                    for target in [key, value] {
                        if !shapes.contains_key(target) {
                            return Err(ModelError::UnresolvedShapeTarget {
                                shape: shape.id().clone(),
                                target: target.clone(),
                            });
                        }
                    }
                }
                ShapeKind::Enum | ShapeKind::Primitive => {}
            }
        }

        let mut operations = BTreeMap::new();
        for operation in self.operations {
            for target in [operation.input(), operation.output()].into_iter().flatten() {
                let Some(shape) = shapes.get(target) else {
                    return Err(ModelError::UnresolvedOperationTarget {
                        operation: operation.id().clone(),
                        target: target.clone(),
                    });
                };
                if !shape.is_structure() {
                    return Err(ModelError::OperationTargetNotStructure {
                        operation: operation.id().clone(),
                        target: target.clone(),
                    });
                }
            }
            let id = operation.id().clone();
            if operations.insert(id.clone(), operation).is_some() {
                return Err(ModelError::DuplicateOperation(id));
            }
        }

        Ok(Model { shapes, operations })
    }
}
