//! Schema transformer: raw tracking payload to canonical webhook record.

use std::collections::{BTreeMap, HashMap};

use super::types::{CanonicalRecord, RawRecord, TaggedValue};

/// Reshape a raw record into the canonical schema.
///
/// Field renames are fixed. Attribute and trait values are wrapped as
/// string-typed values. This never fails and has no side effects.
pub fn transform(raw: &RawRecord) -> CanonicalRecord {
    CanonicalRecord {
        event: raw.ev.clone(),
        event_type: raw.et.clone(),
        app_id: raw.id.clone(),
        user_id: raw.uid.clone(),
        message_id: raw.mid.clone(),
        page_title: raw.t.clone(),
        page_url: raw.p.clone(),
        browser_language: raw.l.clone(),
        screen_size: raw.sc.clone(),
        attributes: tag_values(&raw.attributes),
        traits: tag_values(&raw.traits),
    }
}

fn tag_values(values: &HashMap<String, String>) -> BTreeMap<String, TaggedValue> {
    values
        .iter()
        .map(|(k, v)| (k.clone(), TaggedValue::string(v.as_str())))
        .collect()
}
