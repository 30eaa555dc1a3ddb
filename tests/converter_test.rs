use ingest_relay::{convert, AttributeDetail, CanonicalEvent, RawPayload, SchemaError};
use serde_json::json;

const REQUIRED_FIELDS: [&str; 9] = ["ev", "et", "id", "uid", "mid", "t", "p", "l", "sc"];

fn base_payload() -> RawPayload {
    serde_json::from_value(json!({
        "ev": "click",
        "et": "track",
        "id": "app1",
        "uid": "u1",
        "mid": "m1",
        "t": "Home",
        "p": "http://x",
        "l": "en",
        "sc": "1920x1080",
    }))
    .unwrap()
}

#[test]
fn test_scalar_fields_are_mapped() {
    let event = convert(&base_payload()).unwrap();

    assert_eq!(event.event, "click");
    assert_eq!(event.event_type, "track");
    assert_eq!(event.app_id, "app1");
    assert_eq!(event.user_id, "u1");
    assert_eq!(event.message_id, "m1");
    assert_eq!(event.page_title, "Home");
    assert_eq!(event.page_url, "http://x");
    assert_eq!(event.browser_language, "en");
    assert_eq!(event.screen_size, "1920x1080");
}

#[test]
fn test_no_triplets_gives_empty_sets() {
    let event = convert(&base_payload()).unwrap();
    assert!(event.attributes.is_empty());
    assert!(event.user_traits.is_empty());
}

#[test]
fn test_attributes_and_traits_are_embedded() {
    let mut data = base_payload();
    data.insert("atrk1".into(), json!("color"));
    data.insert("atrv1".into(), json!("red"));
    data.insert("atrt1".into(), json!("string"));
    data.insert("uatrk1".into(), json!("plan"));
    data.insert("uatrv1".into(), json!("pro"));
    data.insert("uatrt1".into(), json!("string"));

    let event = convert(&data).unwrap();
    assert_eq!(event.attributes["color"], AttributeDetail::new("red", "string"));
    assert_eq!(event.user_traits["plan"], AttributeDetail::new("pro", "string"));
}

#[test]
fn test_each_missing_field_is_reported() {
    for field in REQUIRED_FIELDS {
        let mut data = base_payload();
        data.remove(field);

        let err = convert(&data).unwrap_err();
        assert_eq!(err, SchemaError::MissingField { field });
        assert_eq!(err.field(), field);
    }
}

#[test]
fn test_non_string_field_is_reported() {
    let mut data = base_payload();
    data.insert("uid".into(), json!(42));

    let err = convert(&data).unwrap_err();
    assert_eq!(err, SchemaError::WrongType { field: "uid", found: "number" });
    assert_eq!(err.to_string(), "field 'uid' must be a string, found number");
}

#[test]
fn test_first_missing_field_wins() {
    let mut data = base_payload();
    data.remove("sc");
    data.remove("et");

    assert_eq!(convert(&data).unwrap_err(), SchemaError::MissingField { field: "et" });
}

#[test]
fn test_wire_field_names() {
    let mut data = base_payload();
    data.insert("uatrk1".into(), json!("plan"));
    data.insert("uatrv1".into(), json!("pro"));
    data.insert("uatrt1".into(), json!("string"));

    let value = serde_json::to_value(convert(&data).unwrap()).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "app_id",
            "attributes",
            "browser_language",
            "event",
            "event_type",
            "message_id",
            "page_title",
            "page_url",
            "screen_size",
            "traits",
            "user_id",
        ]
    );
    assert_eq!(value["traits"], json!({"plan": {"value": "pro", "type": "string"}}));
}

#[test]
fn test_serialized_event_parses_back() {
    let mut data = base_payload();
    data.insert("atrk1".into(), json!("color"));
    data.insert("atrv1".into(), json!("red"));
    data.insert("atrt1".into(), json!("string"));

    let event = convert(&data).unwrap();
    let bytes = serde_json::to_vec(&event).unwrap();
    let parsed: CanonicalEvent = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, event);
}
