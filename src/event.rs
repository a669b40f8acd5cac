use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use typed_builder::TypedBuilder;

use crate::error::HecResult;

/// A single telemetry event submitted to the collector.
///
/// Only the payload is required; every metadata field is optional and is
/// omitted from the wire format when unset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct Event {
    #[builder(setter(into))]
    pub event: Value,

    /// Epoch timestamp with millisecond precision, e.g. `"1485237827.123"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    pub time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    pub index: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option))]
    pub sourcetype: Option<String>,

    /// Additional indexed fields, sent alongside the payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(strip_option))]
    pub fields: Option<serde_json::Map<String, Value>>,
}

impl Event {
    /// True when the payload is absent or blank and no metadata field is set.
    /// Empty events are dropped before chunking and never transmitted.
    pub fn is_empty(&self) -> bool {
        let blank = match &self.event {
            Value::Null => true,
            Value::String(text) => text.trim().is_empty(),
            _ => false,
        };
        blank
            && self.time.is_none()
            && self.host.is_none()
            && self.index.is_none()
            && self.source.is_none()
            && self.sourcetype.is_none()
            && self.fields.is_none()
    }

    pub(crate) fn encode(&self) -> HecResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Metadata attached to a raw-mode submission as query parameters.
///
/// Each field is independently optional; absent fields are left out of the
/// request entirely rather than defaulted.
#[derive(Debug, Clone, Default, PartialEq, TypedBuilder)]
#[builder(field_defaults(default, setter(into, strip_option)))]
pub struct EventMetadata {
    pub host: Option<String>,
    pub index: Option<String>,
    pub source: Option<String>,
    pub sourcetype: Option<String>,
    pub time: Option<DateTime<Utc>>,
}

/// Formats a timestamp the way the collector expects it: epoch seconds with
/// a millisecond fraction.
pub fn epoch_time(time: &DateTime<Utc>) -> String {
    format!("{}.{:03}", time.timestamp(), time.timestamp_subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn serializes_only_present_fields() {
        let event = Event::builder().event("hello, world").build();
        let data = String::from_utf8(event.encode().unwrap()).unwrap();
        assert_eq!(data, r#"{"event":"hello, world"}"#);
    }

    #[test]
    fn serializes_metadata_when_set() {
        let event = Event::builder()
            .event("hello, world")
            .index("main")
            .source("test-hec")
            .sourcetype("manual")
            .host("localhost")
            .time("1485237827.123")
            .build();
        let value: Value = serde_json::from_slice(&event.encode().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "hello, world",
                "time": "1485237827.123",
                "host": "localhost",
                "index": "main",
                "source": "test-hec",
                "sourcetype": "manual",
            })
        );
    }

    #[test]
    fn empty_event_detection() {
        assert!(Event::builder().build().is_empty());
        assert!(Event::builder().event("   ").build().is_empty());
        assert!(!Event::builder().event("x").build().is_empty());
        assert!(!Event::builder().event(json!({"k": "v"})).build().is_empty());
        // A blank payload with metadata set still carries information.
        assert!(!Event::builder().host("localhost").build().is_empty());
    }

    #[test]
    fn epoch_time_keeps_millisecond_precision() {
        let time = Utc.timestamp_opt(1485237827, 123_000_000).unwrap();
        assert_eq!(epoch_time(&time), "1485237827.123");

        let whole = Utc.timestamp_opt(1485237827, 0).unwrap();
        assert_eq!(epoch_time(&whole), "1485237827.000");
    }
}
