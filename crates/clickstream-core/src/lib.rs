//! clickstream-core: record transformation engine for the clickstream ETL.
//!
//! This crate turns raw, variable-shape event records (as produced by client
//! SDKs and the ingestion endpoint) into fixed-schema canonical records.
//!
//! # Architecture
//!
//! ```text
//! text ──► dataset ──► Transformer ──► Dataset<CanonicalEventRecord>
//!                          │
//!              ┌───────────┼────────────┐
//!           mapping     user_agent   derived fields
//!              │
//!           accessor (lookup + coercion)
//! ```
//!
//! Every stage is a pure function over borrowed input. The only fallible
//! step is decoding the dataset text itself; everything after that recovers
//! per record by substituting defaults.

pub mod accessor;
pub mod config;
pub mod dataset;
pub mod error;
pub mod mapping;
pub mod schema;
pub mod transformer;
pub mod types;
pub mod user_agent;

pub use accessor::FieldAccessor;
pub use config::Config;
pub use dataset::{parse_dataset, Dataset, InputFormat};
pub use error::TransformError;
pub use transformer::Transformer;
pub use types::{
    AppInfo, CanonicalEventRecord, Device, EventParameter, Geo, ParameterValue, RawEventRecord,
};
pub use user_agent::{parse_user_agent, UserAgentInfo};
