//! Where the raw dataset text comes from.

use std::path::PathBuf;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {source_name}")]
    Read {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
}

/// A raw dataset location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Stdin,
    /// In-memory text, mostly for tests and embedding.
    Text(String),
}

impl DatasetSource {
    /// `None` or `-` means stdin.
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) if p.as_os_str() != "-" => DatasetSource::File(p),
            _ => DatasetSource::Stdin,
        }
    }

    pub fn name(&self) -> String {
        match self {
            DatasetSource::File(p) => p.display().to_string(),
            DatasetSource::Stdin => "<stdin>".to_string(),
            DatasetSource::Text(_) => "<memory>".to_string(),
        }
    }

    /// Read the whole source. Non-UTF-8 bytes are replaced, not rejected;
    /// the dataset reader decides whether what remains is usable.
    pub async fn read_to_string(&self) -> Result<String, SourceError> {
        let bytes = match self {
            DatasetSource::File(path) => tokio::fs::read(path).await,
            DatasetSource::Stdin => {
                let mut buf = Vec::new();
                tokio::io::stdin().read_to_end(&mut buf).await.map(|_| buf)
            }
            DatasetSource::Text(text) => return Ok(text.clone()),
        }
        .map_err(|error| SourceError::Read {
            source_name: self.name(),
            error,
        })?;

        debug!(source = %self.name(), bytes = bytes.len(), "read dataset source");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
