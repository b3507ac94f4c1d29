//! Record formats on either side of the relay.
//!
//! - `RawRecord`: the tracking payload as posted to `/receive`
//! - `CanonicalRecord`: the reshaped payload delivered to the webhook

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Inbound Record (POST /receive)
// =============================================================================

/// Raw event-tracking payload.
///
/// Field names are the short keys used by tracking snippets. Every field is
/// optional; missing and `null` fields both become empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Event name
    #[serde(default, deserialize_with = "null_as_default")]
    pub ev: String,
    /// Event type
    #[serde(default, deserialize_with = "null_as_default")]
    pub et: String,
    /// Application id
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// User id
    #[serde(default, deserialize_with = "null_as_default")]
    pub uid: String,
    /// Message id
    #[serde(default, deserialize_with = "null_as_default")]
    pub mid: String,
    /// Page title
    #[serde(default, deserialize_with = "null_as_default")]
    pub t: String,
    /// Page URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub p: String,
    /// Browser language
    #[serde(default, deserialize_with = "null_as_default")]
    pub l: String,
    /// Screen size
    #[serde(default, deserialize_with = "null_as_default")]
    pub sc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub traits: HashMap<String, String>,
}

impl RawRecord {
    /// Parse a request body. A literal `null` body yields an empty record.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice::<Option<RawRecord>>(body).map(Option::unwrap_or_default)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Outbound Record (webhook)
// =============================================================================

/// Canonical record expected by the downstream webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub event: String,
    pub event_type: String,
    pub app_id: String,
    pub user_id: String,
    pub message_id: String,
    pub page_title: String,
    pub page_url: String,
    pub browser_language: String,
    pub screen_size: String,
    pub attributes: BTreeMap<String, TaggedValue>,
    pub traits: BTreeMap<String, TaggedValue>,
}

/// A value paired with its declared type, e.g. `{"value": "1", "type": "string"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedValue {
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

impl TaggedValue {
    /// Tag a value as a string.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            value_type: ValueType::String,
        }
    }
}

/// Declared type of a tagged value. Inputs are untyped, so only strings exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
}
