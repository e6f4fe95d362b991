//! Decision records returned by synthesized redaction closures.
//!
//! A generated logging layer calls one closure per binding kind for every
//! request and response it instruments. The closure maps a runtime key (a
//! header name, a query string key) to one of these markers; the logging
//! layer then hides exactly the parts the marker names.
//!
//! Markers are plain data. They carry no behavior so that the closures
//! producing them stay pure and allocation free.

/// Redaction decision for a single query string pair.
///
/// Key and value redaction are independent: a wildcard query map can have
/// sensitive keys with public values, or the reverse.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct QueryMarker {
    /// Redact the query key.
    pub key: bool,
    /// Redact the query value.
    pub value: bool,
}

/// Redaction decision for a single header.
///
/// `key_suffix` supports prefix-header maps: when the map *key* is sensitive,
/// the part of the header name after the shared prefix is the key and must be
/// hidden, while the prefix itself stays printable. `value` and `key_suffix`
/// are independent of one another.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct HeaderMarker {
    /// Redact the header value.
    pub value: bool,
    /// When set, redact the header name from this byte offset onwards.
    pub key_suffix: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_marker_defaults_to_no_redaction() {
        assert_eq!(
            QueryMarker::default(),
            QueryMarker {
                key: false,
                value: false
            }
        );
    }

    #[test]
    fn header_marker_defaults_to_no_redaction() {
        assert_eq!(
            HeaderMarker::default(),
            HeaderMarker {
                value: false,
                key_suffix: None
            }
        );
    }

    #[test]
    fn markers_are_comparable_and_hashable() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(HeaderMarker {
            value: true,
            key_suffix: Some(7),
        });
        assert!(set.contains(&HeaderMarker {
            value: true,
            key_suffix: Some(7),
        }));
    }
}
