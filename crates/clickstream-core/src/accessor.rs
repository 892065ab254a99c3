//! Field accessor: named, typed lookups over open records.
//!
//! Raw records have no fixed schema, so every read goes through
//! [`FieldAccessor`]: a dotted-path lookup returning an optional value, plus
//! typed lookups that apply the coercion rules below. The rules live here and
//! nowhere else.
//!
//! | target  | accepted                                                  |
//! |---------|-----------------------------------------------------------|
//! | string  | string, number (decimal text), bool                       |
//! | int     | i64-range integer, integral float, numeric string         |
//! | float   | finite number, string parsing to a finite float           |
//!
//! Anything else (null, objects, arrays, out-of-range or non-numeric values)
//! coerces to `None` and is treated as a missing field by the caller.

use serde_json::{Map, Value};

use crate::types::RawEventRecord;

/// Capability to look up a named field and read it as a typed value.
pub trait FieldAccessor {
    /// Resolve a dotted path (`device.web_info`) to a non-null value.
    fn field(&self, path: &str) -> Option<&Value>;

    fn string(&self, path: &str) -> Option<String> {
        self.field(path).and_then(coerce_string)
    }

    fn int(&self, path: &str) -> Option<i64> {
        self.field(path).and_then(coerce_int)
    }

    fn float(&self, path: &str) -> Option<f64> {
        self.field(path).and_then(coerce_float)
    }

    fn object(&self, path: &str) -> Option<&Map<String, Value>> {
        self.field(path).and_then(Value::as_object)
    }

    /// Like [`field`](Self::field), but the last segment of a dotted path
    /// matches keys in any ASCII case (`headers.user-agent` finds
    /// `headers.User-Agent`). An exact match wins.
    fn field_ignore_case(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.field(path) {
            return Some(value);
        }
        let (parent, name) = path.rsplit_once('.')?;
        self.object(parent)?
            .iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(name) && !value.is_null())
            .map(|(_, value)| value)
    }

    /// First source path that yields a string, in order.
    fn first_string<'a, I>(&self, paths: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        paths.into_iter().find_map(|path| self.string(path))
    }
}

impl FieldAccessor for Map<String, Value> {
    fn field(&self, path: &str) -> Option<&Value> {
        lookup(self, path).filter(|value| !value.is_null())
    }
}

impl FieldAccessor for RawEventRecord {
    fn field(&self, path: &str) -> Option<&Value> {
        self.fields().field(path)
    }
}

/// Keys may themselves contain dots (`log.level`), so an exact key match is
/// tried before descending at each dot position.
fn lookup<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(path) {
        return Some(value);
    }
    for (idx, _) in path.match_indices('.') {
        if let Some(Value::Object(inner)) = map.get(&path[..idx]) {
            if let Some(value) = lookup(inner, &path[idx + 1..]) {
                return Some(value);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Coercion rules
// ---------------------------------------------------------------------------

pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| if n.is_u64() { None } else { n.as_f64().and_then(integral) }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

pub fn coerce_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// A float converts to an integer only when nothing is lost.
fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
