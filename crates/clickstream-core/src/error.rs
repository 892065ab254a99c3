//! Error type for the transformation engine.
//!
//! Per-record anomalies (missing fields, mistyped values, undecodable lines)
//! are recovered locally and never show up here. Only dataset-level
//! structural failures are surfaced to the caller.

use thiserror::Error;

/// A dataset-level failure that aborts the whole transform.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The input text could not be interpreted as a sequence of record-like
    /// structures at all.
    #[error("malformed dataset: {reason}")]
    MalformedDataset { reason: String },
}

impl TransformError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TransformError::MalformedDataset {
            reason: reason.into(),
        }
    }
}
