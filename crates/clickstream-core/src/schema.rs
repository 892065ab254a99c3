//! The canonical schema as a flat list of leaf paths.
//!
//! [`CANONICAL_FIELDS`] is the serialisation order of
//! [`CanonicalEventRecord`](crate::CanonicalEventRecord). Arrays are leaves:
//! `event_params` appears once regardless of how many parameters a record has.

use serde_json::Value;

pub const CANONICAL_FIELDS: &[&str] = &[
    "event_id",
    "event_name",
    "event_date",
    "event_timestamp",
    "ingest_timestamp",
    "app_id",
    "project_id",
    "platform",
    "user_id",
    "user_pseudo_id",
    "device.vendor_id",
    "device.mobile_brand_name",
    "device.mobile_model_name",
    "device.manufacturer",
    "device.carrier",
    "device.network_type",
    "device.operating_system",
    "device.operating_system_version",
    "device.screen_width",
    "device.screen_height",
    "device.viewport_width",
    "device.viewport_height",
    "device.time_zone_offset_seconds",
    "device.system_language",
    "device.host_name",
    "device.ua_browser",
    "device.ua_browser_version",
    "device.ua_os",
    "device.ua_os_version",
    "device.ua_device",
    "device.ua_device_category",
    "device.web_info",
    "geo.country",
    "geo.region",
    "geo.city",
    "geo.locale",
    "app_info.app_id",
    "app_info.id",
    "app_info.install_source",
    "app_info.version",
    "app_info.title",
    "event_params",
];

/// Leaf paths of a serialised record, in document order.
pub fn field_paths(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect(value, "", &mut out);
    out
}

fn collect(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) if !map.is_empty() || prefix.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect(child, &path, out);
            }
        }
        _ => out.push(prefix.to_string()),
    }
}
