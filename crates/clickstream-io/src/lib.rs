//! clickstream-io: dataset source and sink adapters for the ETL driver.
//!
//! The transform engine never performs I/O. These adapters are the driver's
//! side of that boundary: a [`DatasetSource`] produces the raw dataset text,
//! an [`NdjsonSink`] writes canonical records one JSON document per line.

pub mod sink;
pub mod source;

pub use sink::{NdjsonSink, SinkError};
pub use source::{DatasetSource, SourceError};
