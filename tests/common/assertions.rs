//! Domain-specific assertion macros for clickstream-etl harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! record and the canonical field that went wrong.

use clickstream_etl::clickstream_core::schema::{field_paths, CANONICAL_FIELDS};
use clickstream_etl::{CanonicalEventRecord, Dataset};

// ---------------------------------------------------------------------------
// Field assertions
// ---------------------------------------------------------------------------

/// Assert that a record carries exactly `ua` in `device.web_info`.
///
/// ```rust
/// assert_web_info!(record, "curl/8.4.0");
/// ```
#[macro_export]
macro_rules! assert_web_info {
    ($record:expr, $ua:expr) => {{
        let record: &clickstream_etl::CanonicalEventRecord = &$record;
        let expected: &str = $ua;
        if record.device.web_info != expected {
            panic!(
                "assert_web_info! failed for event {:?}:\n  expected: {:?}\n  actual:   {:?}",
                record.event_id, expected, record.device.web_info
            );
        }
    }};
}

/// Assert that every record in a dataset passed the User-Agent through
/// untouched, pairing outputs with the given inputs by position.
#[macro_export]
macro_rules! assert_web_info_all {
    ($output:expr, $uas:expr) => {{
        let output = &$output;
        let uas: &[&str] = &$uas;
        pretty_assertions::assert_eq!(output.len(), uas.len(), "record count differs");
        for (record, ua) in output.iter().zip(uas.iter()) {
            $crate::assert_web_info!(*record, ua);
        }
    }};
}

// ---------------------------------------------------------------------------
// Shape assertions
// ---------------------------------------------------------------------------

/// Panic unless `record` serialises to exactly the canonical leaf paths, in
/// canonical order.
pub fn assert_canonical_shape(record: &CanonicalEventRecord) {
    let value = serde_json::to_value(record).unwrap();
    let paths = field_paths(&value);
    let expected: Vec<String> = CANONICAL_FIELDS.iter().map(|s| s.to_string()).collect();
    pretty_assertions::assert_eq!(
        paths,
        expected,
        "record {:?} does not match the canonical schema",
        record.event_id
    );
}

/// Panic unless every record in `dataset` has the canonical shape.
pub fn assert_dataset_shape(dataset: &Dataset<CanonicalEventRecord>) {
    for record in dataset {
        assert_canonical_shape(record);
    }
}

/// Panic unless `record` is the all-defaults record.
pub fn assert_default_record(record: &CanonicalEventRecord) {
    let expected = CanonicalEventRecord::default();
    pretty_assertions::assert_eq!(
        record,
        &expected,
        "expected a default record for undecodable input"
    );
}
