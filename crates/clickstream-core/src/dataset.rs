//! Dataset: the batch unit the transform runs over, and the JSON reader that
//! produces it.
//!
//! Decoding is attempted in order: whole-document JSON (single object or
//! array) → NDJSON lines. Lines that fail to decode become corrupt records
//! rather than being dropped, so the dataset keeps one record per input
//! record. A non-empty input in which *nothing* decodes to an object is a
//! [`TransformError::MalformedDataset`].

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TransformError;
use crate::types::RawEventRecord;

/// How to interpret the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Single object, JSON array, or NDJSON, detected from the content.
    #[default]
    Auto,
    /// One JSON object per line.
    Ndjson,
    /// One top-level JSON array of objects.
    Array,
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "ndjson" | "jsonl" => Ok(InputFormat::Ndjson),
            "array" => Ok(InputFormat::Array),
            other => Err(format!("unknown input format {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// An ordered batch of records.
///
/// Order is kept for convenience; the transform contract itself does not
/// promise it across partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<T> {
    records: Vec<T>,
}

impl<T> Dataset<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    /// Split into at most `n` contiguous partitions of near-equal size.
    /// Never yields an empty partition; an empty dataset yields none.
    pub fn partitions(self, n: usize) -> Vec<Dataset<T>> {
        let n = n.max(1);
        let total = self.records.len();
        if total == 0 {
            return Vec::new();
        }
        let size = total.div_ceil(n);
        let mut out = Vec::with_capacity(n.min(total));
        let mut rest = self.records;
        while !rest.is_empty() {
            let tail = rest.split_off(size.min(rest.len()));
            out.push(Dataset::new(rest));
            rest = tail;
        }
        out
    }

    /// Join partitions back into one dataset, in the given order.
    pub fn concat(parts: impl IntoIterator<Item = Dataset<T>>) -> Dataset<T> {
        parts.into_iter().flat_map(Dataset::into_records).collect()
    }
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> FromIterator<T> for Dataset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Dataset<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Dataset<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Decode `text` into raw records. A leading UTF-8 byte-order mark is ignored.
pub fn parse_dataset(
    text: &str,
    format: InputFormat,
) -> Result<Dataset<RawEventRecord>, TransformError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return match format {
            InputFormat::Array => Err(TransformError::malformed("expected a JSON array, found no input")),
            InputFormat::Auto | InputFormat::Ndjson => Ok(Dataset::default()),
        };
    }

    let dataset = match format {
        InputFormat::Ndjson => parse_lines(text)?,
        InputFormat::Array => match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(items)) => from_array(items)?,
            Ok(other) => {
                return Err(TransformError::malformed(format!(
                    "expected a JSON array, found {}",
                    kind(&other)
                )))
            }
            Err(e) => return Err(TransformError::malformed(format!("invalid JSON array: {e}"))),
        },
        InputFormat::Auto => match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => Dataset::new(vec![RawEventRecord::new(map)]),
            Ok(Value::Array(items)) => from_array(items)?,
            Ok(other) => {
                return Err(TransformError::malformed(format!(
                    "top-level {} is not a record container",
                    kind(&other)
                )))
            }
            Err(_) => parse_lines(text)?,
        },
    };

    debug!(records = dataset.len(), ?format, "decoded dataset");
    Ok(dataset)
}

fn parse_lines(text: &str) -> Result<Dataset<RawEventRecord>, TransformError> {
    let mut records = Vec::new();
    let mut decoded = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line).map(RawEventRecord::from_value) {
            Ok(Some(record)) => {
                decoded += 1;
                records.push(record);
            }
            Ok(None) => {
                warn!(line = idx + 1, "record is not a JSON object, keeping it as corrupt");
                records.push(RawEventRecord::corrupt(line));
            }
            Err(e) => {
                warn!(line = idx + 1, error = %e, "undecodable record, keeping it as corrupt");
                records.push(RawEventRecord::corrupt(line));
            }
        }
    }

    if decoded == 0 {
        return Err(TransformError::malformed(format!(
            "none of {} lines decoded to a JSON object",
            records.len()
        )));
    }
    Ok(Dataset::new(records))
}

fn from_array(items: Vec<Value>) -> Result<Dataset<RawEventRecord>, TransformError> {
    let total = items.len();
    let mut decoded = 0usize;
    let records: Vec<RawEventRecord> = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let text = if item.is_object() { None } else { Some(item.to_string()) };
            match (RawEventRecord::from_value(item), text) {
                (Some(record), _) => {
                    decoded += 1;
                    record
                }
                (None, text) => {
                    warn!(index = idx, "array element is not a JSON object, keeping it as corrupt");
                    RawEventRecord::corrupt(text.unwrap_or_default())
                }
            }
        })
        .collect();

    if total > 0 && decoded == 0 {
        return Err(TransformError::malformed(format!(
            "none of {total} array elements is a JSON object"
        )));
    }
    Ok(Dataset::new(records))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::FieldAccessor;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_object_is_one_record() {
        let ds = parse_dataset(r#"{"ua":"curl/8.0"}"#, InputFormat::Auto).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.first().unwrap().string("ua").as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn pretty_printed_object_is_one_record() {
        let ds = parse_dataset("{\n  \"ua\": \"curl/8.0\"\n}\n", InputFormat::Auto).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn ndjson_keeps_corrupt_lines() {
        let text = "{\"a\":1}\n\n{broken\n[1,2]\n{\"a\":2}\n";
        let ds = parse_dataset(text, InputFormat::Auto).unwrap();
        assert_eq!(ds.len(), 4);
        let corrupt: Vec<_> = ds.iter().filter(|r| r.is_corrupt()).collect();
        assert_eq!(corrupt.len(), 2);
        assert_eq!(corrupt[0].corrupt_text(), Some("{broken"));
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let ds = parse_dataset("\u{feff}{\"ua\":\"curl/8.0\"}", InputFormat::Auto).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.first().unwrap().string("ua").as_deref(), Some("curl/8.0"));

        let ds = parse_dataset("\u{feff}{\"a\":1}\n{\"a\":2}\n", InputFormat::Ndjson).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.iter().all(|r| !r.is_corrupt()));

        let ds = parse_dataset("\u{feff}[{\"a\":1}]", InputFormat::Array).unwrap();
        assert_eq!(ds.len(), 1);

        assert!(parse_dataset("\u{feff}", InputFormat::Auto).unwrap().is_empty());
    }

    #[test]
    fn array_elements_become_records() {
        let ds = parse_dataset(r#"[{"a":1}, 7, {"a":2}]"#, InputFormat::Auto).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(ds.records()[1].is_corrupt());
        assert_eq!(ds.records()[1].corrupt_text(), Some("7"));
    }

    #[test]
    fn empty_input_is_empty_dataset() {
        assert!(parse_dataset("  \n", InputFormat::Auto).unwrap().is_empty());
        assert!(parse_dataset("[]", InputFormat::Auto).unwrap().is_empty());
        assert!(parse_dataset("", InputFormat::Ndjson).unwrap().is_empty());
    }

    #[test]
    fn unreadable_input_is_malformed() {
        for text in ["not json at all", "42", "\"just a string\"", "[1, 2, 3]", "<xml/>\n<xml/>"] {
            let err = parse_dataset(text, InputFormat::Auto).unwrap_err();
            assert!(
                matches!(err, TransformError::MalformedDataset { .. }),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn forced_array_rejects_ndjson() {
        let err = parse_dataset("{\"a\":1}\n{\"a\":2}", InputFormat::Array).unwrap_err();
        assert!(matches!(err, TransformError::MalformedDataset { .. }));
    }

    #[test]
    fn forced_ndjson_reads_single_line_array_as_corrupt() {
        let err = parse_dataset("[{\"a\":1}]", InputFormat::Ndjson).unwrap_err();
        assert!(matches!(err, TransformError::MalformedDataset { .. }));
    }

    #[test]
    fn partitions_cover_every_record_once() {
        let ds: Dataset<u32> = (0..10).collect();
        let parts = ds.partitions(3);
        assert_eq!(parts.iter().map(Dataset::len).collect::<Vec<_>>(), vec![4, 4, 2]);
        let joined = Dataset::concat(parts);
        assert_eq!(joined.into_records(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn partitions_never_empty() {
        let ds: Dataset<u32> = (0..2).collect();
        assert_eq!(ds.clone().partitions(8).len(), 2);
        assert_eq!(ds.partitions(0).len(), 1);
        assert!(Dataset::<u32>::default().partitions(4).is_empty());
    }

    #[test]
    fn format_from_str() {
        assert_eq!("NDJSON".parse::<InputFormat>(), Ok(InputFormat::Ndjson));
        assert_eq!("jsonl".parse::<InputFormat>(), Ok(InputFormat::Ndjson));
        assert!("csv".parse::<InputFormat>().is_err());
    }
}
