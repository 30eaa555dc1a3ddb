use serde_json::Value;

use crate::error::SchemaError;
use crate::extractor::{extract_attributes, extract_user_traits};
use crate::types::{CanonicalEvent, RawPayload};

/// Reshape a raw submission into the canonical event schema.
///
/// Requires `ev, et, id, uid, mid, t, p, l, sc`, checked in that order.
/// Fails on the first one that is absent or not a string.
pub fn convert(payload: &RawPayload) -> Result<CanonicalEvent, SchemaError> {
    Ok(CanonicalEvent {
        event: required_str(payload, "ev")?,
        event_type: required_str(payload, "et")?,
        app_id: required_str(payload, "id")?,
        user_id: required_str(payload, "uid")?,
        message_id: required_str(payload, "mid")?,
        page_title: required_str(payload, "t")?,
        page_url: required_str(payload, "p")?,
        browser_language: required_str(payload, "l")?,
        screen_size: required_str(payload, "sc")?,
        attributes: extract_attributes(payload),
        user_traits: extract_user_traits(payload),
    })
}

fn required_str(payload: &RawPayload, field: &'static str) -> Result<String, SchemaError> {
    match payload.get(field) {
        None => Err(SchemaError::MissingField { field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(SchemaError::WrongType {
            field,
            found: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
