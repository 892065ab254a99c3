//! clickstream-etl: transform stage of the clickstream analytics pipeline.
//!
//! Raw SDK / ingestion-endpoint events go in, canonical event records come
//! out. This crate is the driver around the engine: it re-exports the core
//! and I/O crates so integration tests can import everything from one place,
//! and hosts the partitioned pipeline run.
//!
//! # Architecture
//!
//! ```text
//! DatasetSource ──► parse_dataset ──► partitions ──► Transformer (per worker)
//!                                                        │
//!                                      NdjsonSink ◄──────┘
//! ```
//!
//! Partitions are mapped on tokio's blocking pool. The transform is pure, so
//! workers share one `Arc<Transformer>` and never coordinate.

pub mod pipeline;

pub use clickstream_core;
pub use clickstream_core::{
    parse_dataset, CanonicalEventRecord, Config, Dataset, Device, InputFormat, RawEventRecord,
    TransformError, Transformer,
};
pub use clickstream_io;
pub use clickstream_io::{DatasetSource, NdjsonSink};
