//! Test builders: ergonomic constructors for raw events and datasets.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use clickstream_etl::{Dataset, RawEventRecord};

use super::fixtures::UA_CHROME_WINDOWS;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// RawEventBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawEventRecord`] test fixtures.
///
/// Keys containing dots are written as nested objects, so
/// `.field("device.web_info", ua)` produces `{"device": {"web_info": ua}}`.
///
/// # Example
///
/// ```rust
/// let raw = RawEventBuilder::new()
///     .event("e-1", "_page_view")
///     .user_agent("curl/8.4.0")
///     .field("geo.country", "DE")
///     .build();
/// ```
#[derive(Default)]
pub struct RawEventBuilder {
    fields: Map<String, Value>,
}

impl RawEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(self, id: &str, name: &str) -> Self {
        self.field("event_id", id).field("event_name", name)
    }

    pub fn timestamp(self, millis: i64) -> Self {
        self.field("event_timestamp", millis)
    }

    pub fn platform(self, platform: &str) -> Self {
        self.field("platform", platform)
    }

    /// Set the User-Agent the way the canonical shape carries it.
    pub fn user_agent(self, ua: &str) -> Self {
        self.field("device.web_info", ua)
    }

    /// Set the User-Agent the way the ingestion endpoint carries it.
    pub fn ingest_ua(self, ua: &str) -> Self {
        self.field("ua", ua)
    }

    pub fn param(self, key: &str, value: impl Into<Value>) -> Self {
        self.field(&format!("event_params.{key}"), value)
    }

    pub fn field(mut self, path: &str, value: impl Into<Value>) -> Self {
        insert_path(&mut self.fields, path, value.into());
        self
    }

    pub fn json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn line(&self) -> String {
        serde_json::to_string(&self.fields).unwrap()
    }

    pub fn build(self) -> RawEventRecord {
        RawEventRecord::new(self.fields)
    }
}

fn insert_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            insert_path(child.as_object_mut().unwrap(), rest, value);
        }
    }
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// A dataset of `n` distinct, fully decodable events.
pub fn dataset_of(n: usize) -> Dataset<RawEventRecord> {
    (0..n)
        .map(|i| {
            RawEventBuilder::new()
                .event(&format!("e-{i}"), "_page_view")
                .timestamp(1_700_000_000_000 + i as i64)
                .user_agent(UA_CHROME_WINDOWS)
                .build()
        })
        .collect()
}

/// NDJSON text for the given builders, one line each.
pub fn ndjson(events: &[RawEventBuilder]) -> String {
    events.iter().map(|e| e.line() + "\n").collect()
}
