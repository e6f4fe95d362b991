//! URI pattern segments and the greedy-label analysis.
//!
//! Patterns arrive as template strings (`/pokemon-species/{name+}`) and are
//! broken into an ordered segment list at parse time. Parsing also enforces
//! the structural invariants the analyzer relies on: at most one greedy
//! label, and no label after a greedy label. Anything past a `?` is a
//! literal query part and takes no part in segment analysis.

use thiserror::Error;

/// One path segment of a URI pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text.
    Literal(String),
    /// A named placeholder bound to an `httpLabel` member of the same name.
    Label {
        /// Label name; matches the bound member's name.
        name: String,
        /// Greedy labels match one or more path components.
        greedy: bool,
    },
}

impl Segment {
    /// The label name, for label segments.
    pub fn label_name(&self) -> Option<&str> {
        match self {
            Self::Label { name, .. } => Some(name),
            Self::Literal(_) => None,
        }
    }
}

/// A greedy label's position and what literally follows it.
///
/// With a greedy label in play the path has a variable number of components,
/// so the logging layer locates trailing fixed text by suffix rather than by
/// index; `trailing` is that suffix (empty when nothing follows).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreedyLabel {
    /// Zero-based index of the greedy label among all segments.
    pub segment_index: usize,
    /// Concatenation of all literal text after the greedy label, with
    /// leading separators (`/ash/ketchum`).
    pub trailing: String,
}

/// Structural failure in a URI pattern.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriPatternError {
    /// The pattern does not start with `/`.
    #[error("URI pattern must begin with `/`")]
    MissingLeadingSlash,
    /// The pattern contains an empty path segment.
    #[error("URI pattern contains an empty segment")]
    EmptySegment,
    /// A label segment is not of the form `{name}` or `{name+}`.
    #[error("malformed label segment `{0}`")]
    MalformedLabel(String),
    /// A label has no name.
    #[error("empty label in URI pattern")]
    EmptyLabel,
    /// More than one greedy label.
    #[error("URI pattern contains more than one greedy label")]
    MultipleGreedyLabels,
    /// A label follows a greedy label.
    #[error("label `{0}` appears after a greedy label")]
    LabelAfterGreedy(String),
}

/// An ordered list of URI pattern segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriPattern {
    segments: Vec<Segment>,
}

impl UriPattern {
    /// Parses a URI template string into segments.
    pub fn parse(pattern: &str) -> Result<Self, UriPatternError> {
        let path = match pattern.find('?') {
            Some(at) => &pattern[..at],
            None => pattern,
        };
        let rest = path
            .strip_prefix('/')
            .ok_or(UriPatternError::MissingLeadingSlash)?;
        if rest.is_empty() {
            return Ok(Self {
                segments: Vec::new(),
            });
        }

        let mut segments = Vec::new();
        for raw in rest.split('/') {
            if raw.is_empty() {
                return Err(UriPatternError::EmptySegment);
            }
            let segment = if let Some(inner) = raw.strip_prefix('{') {
                let inner = inner
                    .strip_suffix('}')
                    .ok_or_else(|| UriPatternError::MalformedLabel(raw.to_string()))?;
                let (name, greedy) = match inner.strip_suffix('+') {
                    Some(name) => (name, true),
                    None => (inner, false),
                };
                if name.is_empty() {
                    return Err(UriPatternError::EmptyLabel);
                }
                if name.contains(|c| c == '{' || c == '}' || c == '+') {
                    return Err(UriPatternError::MalformedLabel(raw.to_string()));
                }
                Segment::Label {
                    name: name.to_string(),
                    greedy,
                }
            } else {
                if raw.contains(|c| c == '{' || c == '}') {
                    return Err(UriPatternError::MalformedLabel(raw.to_string()));
                }
                Segment::Literal(raw.to_string())
            };
            segments.push(segment);
        }

        Self::from_segments(segments)
    }

    /// Builds a pattern from an already-parsed segment list, enforcing the
    /// greedy-label invariants.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self, UriPatternError> {
        let mut greedy_seen = false;
        for segment in &segments {
            if let Segment::Label { name, greedy } = segment {
                if greedy_seen {
                    return Err(if *greedy {
                        UriPatternError::MultipleGreedyLabels
                    } else {
                        UriPatternError::LabelAfterGreedy(name.clone())
                    });
                }
                greedy_seen = *greedy;
            }
        }
        Ok(Self { segments })
    }

    /// The segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Locates the greedy label, if the pattern has one.
    pub fn greedy_label(&self) -> Option<GreedyLabel> {
        let segment_index = self
            .segments
            .iter()
            .position(|s| matches!(s, Segment::Label { greedy: true, .. }))?;
        let mut trailing = String::new();
        for segment in &self.segments[segment_index + 1..] {
            if let Segment::Literal(text) = segment {
                trailing.push('/');
                trailing.push_str(text);
            }
        }
        Some(GreedyLabel {
            segment_index,
            trailing,
        })
    }
}
