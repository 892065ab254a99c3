//! Transformer: maps raw records to canonical records, one for one.
//!
//! A record goes through three steps: the mapping table
//! ([`mapping::FIELD_RULES`]), derived fields (`event_date`, platform
//! spelling, project fallback, `event_params`), and User-Agent decomposition
//! into the `device.ua_*` attributes. `device.web_info` itself is never
//! rewritten.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::config::TransformConfig;
use crate::dataset::{parse_dataset, Dataset, InputFormat};
use crate::error::TransformError;
use crate::mapping;
use crate::types::{CanonicalEventRecord, RawEventRecord};
use crate::user_agent::parse_user_agent;

/// Stateless record mapper. Cheap to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: TransformConfig,
}

impl Transformer {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transform every record. Output has exactly one record per input record.
    #[instrument(level = "debug", skip_all, fields(records = input.len()))]
    pub fn transform(&self, input: &Dataset<RawEventRecord>) -> Dataset<CanonicalEventRecord> {
        let output: Dataset<CanonicalEventRecord> =
            input.iter().map(|raw| self.transform_record(raw)).collect();
        let corrupt = input.iter().filter(|raw| raw.is_corrupt()).count();
        debug!(records = output.len(), corrupt, "transformed dataset");
        output
    }

    /// Decode `text` and transform it. Fails only when the text is not a
    /// dataset at all.
    pub fn transform_json(
        &self,
        text: &str,
        format: InputFormat,
    ) -> Result<Dataset<CanonicalEventRecord>, TransformError> {
        let input = parse_dataset(text, format)?;
        Ok(self.transform(&input))
    }

    /// Map a single record. Never fails: anything missing or uncoercible is
    /// left at its default.
    pub fn transform_record(&self, raw: &RawEventRecord) -> CanonicalEventRecord {
        let mut out = CanonicalEventRecord::default();

        mapping::apply_rules(raw, &self.config, &mut out);

        if out.project_id.is_empty() {
            out.project_id.clone_from(&self.config.project_id);
        }
        out.platform = mapping::normalize_platform(&out.platform);
        out.device.operating_system = mapping::normalize_platform(&out.device.operating_system);
        out.event_date = event_date(out.event_timestamp);
        out.event_params = mapping::extract_event_params(raw);

        if self.config.parse_user_agent && !out.device.web_info.is_empty() {
            let ua = parse_user_agent(&out.device.web_info);
            out.device.ua_browser = ua.browser;
            out.device.ua_browser_version = ua.browser_version;
            out.device.ua_os = ua.os;
            out.device.ua_os_version = ua.os_version;
            out.device.ua_device = ua.device;
            out.device.ua_device_category = ua.device_category;
        }

        out
    }
}

/// UTC calendar date of an epoch-millisecond timestamp; empty when unset or
/// out of range.
fn event_date(millis: i64) -> String {
    if millis <= 0 {
        return String::new();
    }
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
