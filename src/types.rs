use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Decoded request body as received on `/input`.
///
/// Keys are unordered. Values are loosely typed; in practice every value
/// is a JSON string, and only string values are ever read.
pub type RawPayload = HashMap<String, serde_json::Value>;

/// Collected attributes keyed by attribute name.
pub type AttributeSet = HashMap<String, AttributeDetail>;

/// Value and declared type of a single attribute or user trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDetail {
    pub value: String,

    /// Caller-declared type label (e.g. `"string"`, `"number"`).
    /// Carried through untouched; never interpreted by the relay.
    #[serde(rename = "type")]
    pub kind: String,
}

impl AttributeDetail {
    pub fn new(value: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: kind.into(),
        }
    }
}

/// Fixed-schema record forwarded to the destination webhook.
///
/// Field names on the wire are part of the downstream contract and must
/// not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub event: String,
    pub event_type: String,
    pub app_id: String,
    pub user_id: String,
    pub message_id: String,
    pub page_title: String,
    pub page_url: String,
    pub browser_language: String,
    pub screen_size: String,
    pub attributes: AttributeSet,

    #[serde(rename = "traits")]
    pub user_traits: AttributeSet,
}

/// Key-prefix scheme identifying one family of numbered triplets.
///
/// Index `n` of a scheme is made of the three payload keys
/// `{name_prefix}{n}`, `{value_prefix}{n}` and `{type_prefix}{n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripletScheme {
    pub name_prefix: &'static str,
    pub value_prefix: &'static str,
    pub type_prefix: &'static str,
}

impl TripletScheme {
    /// General event attributes: `atrk1`, `atrv1`, `atrt1`, ...
    pub const ATTRIBUTES: TripletScheme = TripletScheme {
        name_prefix: "atrk",
        value_prefix: "atrv",
        type_prefix: "atrt",
    };

    /// User traits: `uatrk1`, `uatrv1`, `uatrt1`, ...
    pub const USER_TRAITS: TripletScheme = TripletScheme {
        name_prefix: "uatrk",
        value_prefix: "uatrv",
        type_prefix: "uatrt",
    };

    /// Payload keys (name, value, type) for the given index.
    pub fn keys(&self, index: usize) -> (String, String, String) {
        (
            format!("{}{}", self.name_prefix, index),
            format!("{}{}", self.value_prefix, index),
            format!("{}{}", self.type_prefix, index),
        )
    }
}

/// Point-in-time copy of the relay counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Payloads accepted onto the dispatch queue.
    pub accepted: u64,

    /// Events the destination acknowledged with a 2xx.
    pub delivered: u64,

    /// Events whose delivery attempt failed.
    pub failed: u64,

    /// Payloads dropped before delivery (schema errors).
    pub dropped: u64,
}

impl DispatchStats {
    /// Number of accepted payloads that reached a final state.
    pub fn processed(&self) -> u64 {
        self.delivered + self.failed + self.dropped
    }
}
