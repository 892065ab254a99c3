//! Core record types for clickstream-core.
//!
//! This module defines the two shapes the engine works between: the open,
//! variable-shape [`RawEventRecord`] and the fixed-schema
//! [`CanonicalEventRecord`] with its nested groups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// One ingested client event before normalisation.
///
/// Fields are addressable by name and nested objects are navigable through
/// [`FieldAccessor`](crate::FieldAccessor). A record that could not be
/// decoded at all is kept as a *corrupt* record with no fields, so that the
/// dataset cardinality survives a bad line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawEventRecord {
    fields: Map<String, Value>,
    corrupt: Option<String>,
}

impl RawEventRecord {
    /// Wrap a decoded JSON object.
    ///
    /// The ingestion endpoint ships the SDK payload as a JSON document inside
    /// a string-valued `data` field. When that string holds a JSON object it
    /// is exposed as a nested object so `data.*` paths resolve.
    pub fn new(mut fields: Map<String, Value>) -> Self {
        let embedded = match fields.get("data") {
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(obj)) => Some(obj),
                _ => None,
            },
            _ => None,
        };
        if let Some(obj) = embedded {
            fields.insert("data".to_string(), Value::Object(obj));
        }
        Self {
            fields,
            corrupt: None,
        }
    }

    /// Build a record from any JSON value; `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::new(map)),
            _ => None,
        }
    }

    /// A placeholder for input that did not decode to an object.
    pub fn corrupt(raw: impl Into<String>) -> Self {
        Self {
            fields: Map::new(),
            corrupt: Some(raw.into()),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        self.corrupt.is_some()
    }

    /// The original text of a corrupt record.
    pub fn corrupt_text(&self) -> Option<&str> {
        self.corrupt.as_deref()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for RawEventRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

// ---------------------------------------------------------------------------
// Canonical output
// ---------------------------------------------------------------------------

/// The fixed-schema output of the transform stage.
///
/// Field order is the serialisation order and never depends on the input.
/// Every field has a default (empty string, zero, empty group), so a record
/// built from an empty input is still schema-complete.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalEventRecord {
    pub event_id: String,
    pub event_name: String,
    /// UTC calendar date of `event_timestamp`, `YYYY-MM-DD`.
    pub event_date: String,
    /// Client event time, epoch milliseconds.
    pub event_timestamp: i64,
    /// Server ingest time, epoch milliseconds.
    pub ingest_timestamp: i64,
    pub app_id: String,
    pub project_id: String,
    pub platform: String,
    pub user_id: String,
    pub user_pseudo_id: String,
    /// Always materialised, even when the input carries no client details.
    pub device: Device,
    pub geo: Geo,
    pub app_info: AppInfo,
    /// Custom event attributes, sorted by key.
    pub event_params: Vec<EventParameter>,
}

/// Client device and runtime attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Device {
    pub vendor_id: String,
    pub mobile_brand_name: String,
    pub mobile_model_name: String,
    pub manufacturer: String,
    pub carrier: String,
    pub network_type: String,
    pub operating_system: String,
    pub operating_system_version: String,
    pub screen_width: i64,
    pub screen_height: i64,
    pub viewport_width: i64,
    pub viewport_height: i64,
    pub time_zone_offset_seconds: i64,
    pub system_language: String,
    pub host_name: String,
    pub ua_browser: String,
    pub ua_browser_version: String,
    pub ua_os: String,
    pub ua_os_version: String,
    pub ua_device: String,
    pub ua_device_category: String,
    /// The User-Agent string exactly as received.
    pub web_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geo {
    pub country: String,
    pub region: String,
    pub city: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppInfo {
    pub app_id: String,
    /// Package / bundle identifier.
    pub id: String,
    pub install_source: String,
    pub version: String,
    pub title: String,
}

/// One custom attribute of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParameter {
    pub key: String,
    pub value: ParameterValue,
}

/// Typed attribute value; exactly one member is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterValue {
    pub string_value: Option<String>,
    pub int_value: Option<i64>,
    pub double_value: Option<f64>,
}

impl ParameterValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn int(value: i64) -> Self {
        Self {
            int_value: Some(value),
            ..Self::default()
        }
    }

    pub fn double(value: f64) -> Self {
        Self {
            double_value: Some(value),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
