//! The [`Sensitive`] wrapper and the redaction placeholder.
//!
//! Generated code wraps values it knows to be sensitive before handing them
//! to any formatting machinery. The wrapper's `Display` and `Debug` output is
//! the placeholder string, so a stray `{}` or `{:?}` in a log line cannot
//! leak the payload. The `unredacted` feature inverts this for local
//! debugging of generated services.

use std::fmt;

/// Output of every redacted formatting site.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

/// A value known to be sensitive at code-generation time.
///
/// ```
/// use shroud::Sensitive;
///
/// let secret = Sensitive("dd185b");
/// # #[cfg(not(feature = "unredacted"))]
/// assert_eq!(format!("{secret}"), "[REDACTED]");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sensitive<T>(pub T);

impl<T> Sensitive<T> {
    /// Wraps a sensitive value.
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the wrapped value.
    ///
    /// Callers are responsible for not routing the result into log output.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Sensitive<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if cfg!(feature = "unredacted") {
            self.0.fmt(f)
        } else {
            REDACTED_PLACEHOLDER.fmt(f)
        }
    }
}

impl<T> fmt::Debug for Sensitive<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if cfg!(feature = "unredacted") {
            self.0.fmt(f)
        } else {
            REDACTED_PLACEHOLDER.fmt(f)
        }
    }
}
