//! Integration tests for the slog adapter.
//!
//! These verify that `Sensitive<T>` serializes through slog's `Value` API as
//! the redaction placeholder, never as the wrapped payload.

#![cfg(feature = "slog")]

use std::{cell::RefCell, collections::HashMap, fmt::Arguments};

use serde::Serialize;
use shroud::{Sensitive, REDACTED_PLACEHOLDER};

// A test serializer that captures serialized key-value pairs.
struct CapturingSerializer {
    captured: RefCell<HashMap<String, String>>,
}

impl CapturingSerializer {
    fn new() -> Self {
        Self {
            captured: RefCell::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.captured.borrow().get(key).cloned()
    }
}

impl slog::Serializer for CapturingSerializer {
    fn emit_arguments(&mut self, key: slog::Key, val: &Arguments<'_>) -> slog::Result {
        self.captured
            .borrow_mut()
            .insert(key.into(), val.to_string());
        Ok(())
    }

    fn emit_str(&mut self, key: slog::Key, val: &str) -> slog::Result {
        self.captured.borrow_mut().insert(key.into(), val.into());
        Ok(())
    }

    fn emit_serde(&mut self, key: slog::Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let json = serde_json::to_value(val.as_serde()).unwrap_or(serde_json::Value::Null);
        self.captured.borrow_mut().insert(key.into(), json.to_string());
        Ok(())
    }
}

/// Serializes a slog::Value into the capturing serializer.
fn serialize_to_capture<V: slog::Value>(
    value: &V,
    key: &'static str,
    serializer: &mut CapturingSerializer,
) {
    static RS: slog::RecordStatic<'static> = slog::record_static!(slog::Level::Info, "");
    let args = format_args!("");
    let record = slog::Record::new(&RS, &args, slog::b!());
    value.serialize(&record, key, serializer).unwrap();
}

#[derive(Clone, Serialize)]
struct Credentials {
    username: String,
    password: String,
}

#[cfg(not(feature = "unredacted"))]
#[test]
fn sensitive_string_logs_as_placeholder() {
    let token = Sensitive("super_secret_token".to_string());

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&token, "token", &mut serializer);

    assert_eq!(serializer.get("token").as_deref(), Some(REDACTED_PLACEHOLDER));
}

#[cfg(not(feature = "unredacted"))]
#[test]
fn sensitive_struct_logs_as_placeholder_not_fields() {
    let credentials = Sensitive(Credentials {
        username: "alice".into(),
        password: "hunter2".into(),
    });

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&credentials, "credentials", &mut serializer);

    let captured = serializer.get("credentials").unwrap();
    assert_eq!(captured, REDACTED_PLACEHOLDER);
    assert!(!captured.contains("hunter2"));
}

#[cfg(feature = "unredacted")]
#[test]
fn unredacted_build_logs_inner_value_as_json() {
    let credentials = Sensitive(Credentials {
        username: "alice".into(),
        password: "hunter2".into(),
    });

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&credentials, "credentials", &mut serializer);

    let captured = serializer.get("credentials").unwrap();
    assert!(captured.contains("alice"));
    assert!(captured.contains("hunter2"));
}
