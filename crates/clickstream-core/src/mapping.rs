//! Mapping table: named extraction rules from raw source paths to canonical
//! target fields.
//!
//! Each [`FieldRule`] owns exactly one target. It tries its sources in order
//! (configured aliases first) and writes the first value that coerces to the
//! slot's type; when nothing coerces the target keeps its default. Rules do
//! not read each other's output, so editing one mapped attribute cannot
//! disturb another.

use phf::phf_map;
use serde_json::Value;

use crate::accessor::{coerce_int, coerce_string, FieldAccessor};
use crate::config::TransformConfig;
use crate::types::{CanonicalEventRecord, EventParameter, ParameterValue};

/// One raw source path. Integer values are divided by `divisor`, which lets a
/// millisecond source feed a seconds target. With `fold_case` the last path
/// segment matches keys in any ASCII case, as HTTP header names do.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub path: &'static str,
    pub divisor: i64,
    pub fold_case: bool,
}

const fn src(path: &'static str) -> Source {
    Source {
        path,
        divisor: 1,
        fold_case: false,
    }
}

const fn millis(path: &'static str) -> Source {
    Source {
        path,
        divisor: 1000,
        fold_case: false,
    }
}

const fn header(path: &'static str) -> Source {
    Source {
        path,
        divisor: 1,
        fold_case: true,
    }
}

/// Resolve `path` on `raw`, folding the case of the last segment if asked.
fn resolve<'r, A>(raw: &'r A, path: &str, fold_case: bool) -> Option<&'r Value>
where
    A: FieldAccessor + ?Sized,
{
    if fold_case {
        raw.field_ignore_case(path)
    } else {
        raw.field(path)
    }
}

/// Typed handle on the target field.
#[derive(Clone, Copy)]
pub enum Slot {
    Str(fn(&mut CanonicalEventRecord) -> &mut String),
    Int(fn(&mut CanonicalEventRecord) -> &mut i64),
}

pub struct FieldRule {
    /// Dotted canonical path, e.g. `device.web_info`.
    pub target: &'static str,
    pub sources: &'static [Source],
    pub slot: Slot,
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("target", &self.target)
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

impl FieldRule {
    /// Write the first coercible source into `out`. Returns whether a value
    /// was found.
    pub fn apply<'a, A>(
        &self,
        raw: &A,
        extra: impl Iterator<Item = &'a str>,
        out: &mut CanonicalEventRecord,
    ) -> bool
    where
        A: FieldAccessor + ?Sized,
    {
        let mut candidates = extra
            .map(|path| (path, 1, false))
            .chain(self.sources.iter().map(|s| (s.path, s.divisor, s.fold_case)));

        match self.slot {
            Slot::Str(field) => {
                let found = candidates
                    .find_map(|(path, _, fold)| resolve(raw, path, fold).and_then(coerce_string));
                match found {
                    Some(value) => {
                        *field(out) = value;
                        true
                    }
                    None => false,
                }
            }
            Slot::Int(field) => {
                let found = candidates.find_map(|(path, divisor, fold)| {
                    resolve(raw, path, fold)
                        .and_then(coerce_int)
                        .map(|v| v / divisor)
                });
                match found {
                    Some(value) => {
                        *field(out) = value;
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

macro_rules! string_slot {
    ($($field:ident).+) => {{
        fn slot(record: &mut CanonicalEventRecord) -> &mut String {
            &mut record.$($field).+
        }
        Slot::Str(slot)
    }};
}

macro_rules! int_slot {
    ($($field:ident).+) => {{
        fn slot(record: &mut CanonicalEventRecord) -> &mut i64 {
            &mut record.$($field).+
        }
        Slot::Int(slot)
    }};
}

// ---------------------------------------------------------------------------
// The table
// ---------------------------------------------------------------------------

/// User-Agent sources, most specific first. `ua` is what the ingestion
/// endpoint records from the request header.
pub const USER_AGENT_SOURCES: &[Source] = &[
    src("ua"),
    src("device.web_info"),
    src("user_agent"),
    src("userAgent"),
    header("headers.user-agent"),
    src("data.user_agent"),
];

pub static FIELD_RULES: &[FieldRule] = &[
    // -- event ------------------------------------------------------------
    FieldRule {
        target: "event_id",
        sources: &[src("event_id"), src("data.event_id")],
        slot: string_slot!(event_id),
    },
    FieldRule {
        target: "event_name",
        sources: &[src("event_name"), src("event_type"), src("data.event_type")],
        slot: string_slot!(event_name),
    },
    FieldRule {
        target: "event_timestamp",
        sources: &[src("event_timestamp"), src("data.timestamp"), src("timestamp")],
        slot: int_slot!(event_timestamp),
    },
    FieldRule {
        target: "ingest_timestamp",
        sources: &[src("ingest_timestamp"), src("ingest_time"), src("server_ingest_time")],
        slot: int_slot!(ingest_timestamp),
    },
    FieldRule {
        target: "app_id",
        sources: &[src("app_id"), src("appId"), src("data.app_id")],
        slot: string_slot!(app_id),
    },
    FieldRule {
        target: "project_id",
        sources: &[src("project_id")],
        slot: string_slot!(project_id),
    },
    FieldRule {
        target: "platform",
        sources: &[src("platform"), src("data.platform")],
        slot: string_slot!(platform),
    },
    FieldRule {
        target: "user_id",
        sources: &[src("user_id"), src("data.user._user_id.value")],
        slot: string_slot!(user_id),
    },
    FieldRule {
        target: "user_pseudo_id",
        sources: &[src("user_pseudo_id"), src("data.unique_id")],
        slot: string_slot!(user_pseudo_id),
    },
    // -- device -----------------------------------------------------------
    FieldRule {
        target: "device.vendor_id",
        sources: &[src("device.vendor_id"), src("data.device_id")],
        slot: string_slot!(device.vendor_id),
    },
    FieldRule {
        target: "device.mobile_brand_name",
        sources: &[src("device.mobile_brand_name"), src("data.brand")],
        slot: string_slot!(device.mobile_brand_name),
    },
    FieldRule {
        target: "device.mobile_model_name",
        sources: &[src("device.mobile_model_name"), src("data.model")],
        slot: string_slot!(device.mobile_model_name),
    },
    FieldRule {
        target: "device.manufacturer",
        sources: &[src("device.manufacturer"), src("data.make")],
        slot: string_slot!(device.manufacturer),
    },
    FieldRule {
        target: "device.carrier",
        sources: &[src("device.carrier"), src("data.carrier")],
        slot: string_slot!(device.carrier),
    },
    FieldRule {
        target: "device.network_type",
        sources: &[src("device.network_type"), src("data.network_type")],
        slot: string_slot!(device.network_type),
    },
    FieldRule {
        target: "device.operating_system",
        sources: &[src("device.operating_system"), src("data.platform")],
        slot: string_slot!(device.operating_system),
    },
    FieldRule {
        target: "device.operating_system_version",
        sources: &[src("device.operating_system_version"), src("data.os_version")],
        slot: string_slot!(device.operating_system_version),
    },
    FieldRule {
        target: "device.screen_width",
        sources: &[src("device.screen_width"), src("data.screen_width")],
        slot: int_slot!(device.screen_width),
    },
    FieldRule {
        target: "device.screen_height",
        sources: &[src("device.screen_height"), src("data.screen_height")],
        slot: int_slot!(device.screen_height),
    },
    FieldRule {
        target: "device.viewport_width",
        sources: &[src("device.viewport_width"), src("data.viewport_width")],
        slot: int_slot!(device.viewport_width),
    },
    FieldRule {
        target: "device.viewport_height",
        sources: &[src("device.viewport_height"), src("data.viewport_height")],
        slot: int_slot!(device.viewport_height),
    },
    FieldRule {
        target: "device.time_zone_offset_seconds",
        sources: &[src("device.time_zone_offset_seconds"), millis("data.zone_offset")],
        slot: int_slot!(device.time_zone_offset_seconds),
    },
    FieldRule {
        target: "device.system_language",
        sources: &[src("device.system_language"), src("data.system_language")],
        slot: string_slot!(device.system_language),
    },
    FieldRule {
        target: "device.host_name",
        sources: &[src("device.host_name"), src("data.host_name"), src("host")],
        slot: string_slot!(device.host_name),
    },
    FieldRule {
        target: "device.web_info",
        sources: USER_AGENT_SOURCES,
        slot: string_slot!(device.web_info),
    },
    // -- geo --------------------------------------------------------------
    FieldRule {
        target: "geo.country",
        sources: &[src("geo.country"), src("data.country_code")],
        slot: string_slot!(geo.country),
    },
    FieldRule {
        target: "geo.region",
        sources: &[src("geo.region")],
        slot: string_slot!(geo.region),
    },
    FieldRule {
        target: "geo.city",
        sources: &[src("geo.city")],
        slot: string_slot!(geo.city),
    },
    FieldRule {
        target: "geo.locale",
        sources: &[src("geo.locale"), src("data.locale")],
        slot: string_slot!(geo.locale),
    },
    // -- app_info ---------------------------------------------------------
    FieldRule {
        target: "app_info.app_id",
        sources: &[src("app_info.app_id"), src("appId"), src("data.app_id")],
        slot: string_slot!(app_info.app_id),
    },
    FieldRule {
        target: "app_info.id",
        sources: &[src("app_info.id"), src("data.app_package_name")],
        slot: string_slot!(app_info.id),
    },
    FieldRule {
        target: "app_info.install_source",
        sources: &[src("app_info.install_source"), src("data.install_source")],
        slot: string_slot!(app_info.install_source),
    },
    FieldRule {
        target: "app_info.version",
        sources: &[src("app_info.version"), src("data.app_version")],
        slot: string_slot!(app_info.version),
    },
    FieldRule {
        target: "app_info.title",
        sources: &[src("app_info.title"), src("data.app_title")],
        slot: string_slot!(app_info.title),
    },
];

/// Run every rule in [`FIELD_RULES`] against `raw`.
pub fn apply_rules<A>(raw: &A, config: &TransformConfig, out: &mut CanonicalEventRecord)
where
    A: FieldAccessor + ?Sized,
{
    for rule in FIELD_RULES {
        rule.apply(raw, config.aliases_for(rule.target), out);
    }
}

// ---------------------------------------------------------------------------
// Value normalisation
// ---------------------------------------------------------------------------

static PLATFORMS: phf::Map<&'static str, &'static str> = phf_map! {
    "android" => "Android",
    "ios" => "iOS",
    "ipados" => "iOS",
    "web" => "Web",
    "h5" => "Web",
    "wechatminiprogram" => "WeChatMP",
    "harmonyos" => "HarmonyOS",
    "macos" => "macOS",
    "windows" => "Windows",
};

/// Canonical spelling of a platform name; unknown names pass through.
pub fn normalize_platform(raw: &str) -> String {
    let key = raw.trim().to_ascii_lowercase();
    PLATFORMS
        .get(key.as_str())
        .map(|name| name.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Raw locations of the custom attribute map, in priority order.
pub const EVENT_PARAM_SOURCES: &[&str] = &["event_params", "attributes", "data.attributes"];

/// Flatten the first attribute object found into typed parameters, sorted by
/// key. Null-valued attributes are skipped.
pub fn extract_event_params<A>(raw: &A) -> Vec<EventParameter>
where
    A: FieldAccessor + ?Sized,
{
    let Some(attributes) = EVENT_PARAM_SOURCES.iter().find_map(|path| raw.object(path)) else {
        return Vec::new();
    };
    let mut params: Vec<EventParameter> = attributes
        .iter()
        .filter_map(|(key, value)| {
            parameter_value(value).map(|value| EventParameter {
                key: key.clone(),
                value,
            })
        })
        .collect();
    params.sort_by(|a, b| a.key.cmp(&b.key));
    params
}

fn parameter_value(value: &Value) -> Option<ParameterValue> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(ParameterValue::string(s.clone())),
        Value::Bool(b) => Some(ParameterValue::string(b.to_string())),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(ParameterValue::int(i)),
            None => n.as_f64().map(ParameterValue::double),
        },
        Value::Array(_) | Value::Object(_) => Some(ParameterValue::string(value.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
