//! Trait sensitivity oracle and the binding locator.
//!
//! Sensitivity originates in exactly one place: the `sensitive` trait, on a
//! shape or inherited by a member from its target shape. Everything else in
//! the analyzer is propagation of that fact to HTTP-bound members.
//!
//! One traversal backs all four binding-kind resolvers: a depth-first
//! post-order walk over structure-typed members in declaration order,
//! carrying the inherited sensitivity context and an on-path identity set
//! for cycle termination. Resolvers instantiate it with a member predicate
//! ([`find_sensitive_bound`]) or a payload extractor for the at-most-one
//! dynamic map member ([`find_dynamic_map`]).

use tracing::trace;

use crate::analyzer::AnalysisError;
use crate::model::{Member, Model, Shape, ShapeId};

/// Resolves a shape id, surfacing dangling references as faults.
pub(crate) fn expect_shape<'a>(model: &'a Model, id: &ShapeId) -> Result<&'a Shape, AnalysisError> {
    model
        .shape(id)
        .ok_or_else(|| AnalysisError::UnresolvedShape(id.clone()))
}

/// Whether the shape itself carries `sensitive`.
pub(crate) fn shape_is_sensitive(model: &Model, id: &ShapeId) -> Result<bool, AnalysisError> {
    Ok(expect_shape(model, id)?.traits().sensitive())
}

/// Whether the member is sensitive: through its own traits or its target.
pub(crate) fn member_is_sensitive(model: &Model, member: &Member) -> Result<bool, AnalysisError> {
    Ok(member.traits().sensitive() || shape_is_sensitive(model, member.target())?)
}

/// Depth-first post-order walk over every structure reachable from `root`
/// through structure-typed members.
///
/// `visit` sees each member exactly once, together with the sensitivity
/// context at that point: true when the member itself, its target, or any
/// enclosing structure on the path is sensitive. Members of a nested
/// structure are visited before the members of the structure declaring it;
/// within one structure, declaration order applies. A shape already on the
/// current path is not re-entered; list and map members are not descended
/// into.
fn walk_structures<'a, V>(
    model: &'a Model,
    root: &ShapeId,
    inherited: bool,
    path: &mut Vec<ShapeId>,
    visit: &mut V,
) -> Result<(), AnalysisError>
where
    V: FnMut(&'a Member, bool) -> Result<(), AnalysisError>,
{
    let shape = expect_shape(model, root)?;
    if !shape.is_structure() {
        return Err(AnalysisError::UnexpectedShapeKind {
            id: shape.id().clone(),
            expected: "structure",
        });
    }
    trace!(shape = %shape.id(), inherited, "walking structure");
    path.push(shape.id().clone());
    for member in shape.members() {
        let target = expect_shape(model, member.target())?;
        if target.is_structure() && !path.contains(target.id()) {
            let nested = inherited || member_is_sensitive(model, member)?;
            walk_structures(model, member.target(), nested, path, visit)?;
        }
    }
    for member in shape.members() {
        let sensitive = inherited || member_is_sensitive(model, member)?;
        visit(member, sensitive)?;
    }
    path.pop();
    Ok(())
}

/// Members matching `matches` that are tainted by `sensitive`, in post-order.
///
/// A nested structure's matches are reported before a sibling member
/// declared earlier at the outer level; that ordering is observable in the
/// synthesized output and must not change.
pub(crate) fn find_sensitive_bound<'a, F>(
    model: &'a Model,
    root: &ShapeId,
    mut matches: F,
) -> Result<Vec<&'a Member>, AnalysisError>
where
    F: FnMut(&Member) -> bool,
{
    let inherited = shape_is_sensitive(model, root)?;
    let mut found = Vec::new();
    walk_structures(
        model,
        root,
        inherited,
        &mut Vec::new(),
        &mut |member, sensitive| {
            if sensitive && matches(member) {
                found.push(member);
            }
            Ok(())
        },
    )?;
    Ok(found)
}

/// A located dynamic-map binding (prefix headers, wildcard query params).
#[derive(Clone, Debug)]
pub(crate) struct DynamicMap<P> {
    /// The binding trait's payload (header prefix; unit for query params).
    pub(crate) payload: P,
    /// Whether map keys are sensitive at this position in the graph.
    pub(crate) key_sensitive: bool,
    /// Whether map values are sensitive at this position in the graph.
    pub(crate) value_sensitive: bool,
}

/// Locates the at-most-one dynamic map member reachable from `root`.
///
/// `extract` returns the binding payload for matching members. Key and value
/// sensitivity combine the inherited context at the member's position with
/// the map's own key and value shapes. A second match fails fast: silently
/// picking one candidate would produce undetectable redaction gaps.
pub(crate) fn find_dynamic_map<'a, P, F>(
    model: &'a Model,
    root: &ShapeId,
    binding: &'static str,
    mut extract: F,
) -> Result<Option<DynamicMap<P>>, AnalysisError>
where
    F: FnMut(&'a Member) -> Option<P>,
{
    let inherited = shape_is_sensitive(model, root)?;
    let mut found: Option<DynamicMap<P>> = None;
    walk_structures(
        model,
        root,
        inherited,
        &mut Vec::new(),
        &mut |member, sensitive| {
            let Some(payload) = extract(member) else {
                return Ok(());
            };
            if found.is_some() {
                return Err(AnalysisError::DuplicateDynamicBinding {
                    structure: root.clone(),
                    binding,
                });
            }
            let target = expect_shape(model, member.target())?;
            let Some((key, value)) = target.as_map() else {
                return Err(AnalysisError::UnexpectedShapeKind {
                    id: target.id().clone(),
                    expected: "map",
                });
            };
            found = Some(DynamicMap {
                payload,
                key_sensitive: sensitive || shape_is_sensitive(model, key)?,
                value_sensitive: sensitive || shape_is_sensitive(model, value)?,
            });
            Ok(())
        },
    )?;
    Ok(found)
}
