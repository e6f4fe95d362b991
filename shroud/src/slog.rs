//! Adapters for emitting sensitive values through `slog`.
//!
//! This module connects [`Sensitive`](crate::Sensitive) with `slog` by
//! providing a `slog::Value` implementation, so wrapped values can be passed
//! directly as structured log fields.
//!
//! It is responsible for:
//! - Ensuring the logged representation is the redaction placeholder unless
//!   the `unredacted` feature is enabled.
//! - Avoiding fallible logging APIs: serialization failures are represented
//!   as placeholder strings rather than propagated as errors.
//!
//! It does not configure `slog` or decide what counts as sensitive.

use serde::Serialize;
use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{Sensitive, REDACTED_PLACEHOLDER};

impl<T> SlogValue for Sensitive<T>
where
    T: Serialize,
{
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        if cfg!(feature = "unredacted") {
            let json_value = serde_json::to_value(&self.0).unwrap_or_else(|_| {
                JsonValue::String("Failed to serialize sensitive value".to_string())
            });
            let nested = slog::Serde(json_value);
            SlogValue::serialize(&nested, record, key, serializer)
        } else {
            serializer.emit_str(key, REDACTED_PLACEHOLDER)
        }
    }
}
