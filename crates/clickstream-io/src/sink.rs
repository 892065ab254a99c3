//! NDJSON output: one serialised record per line.

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to encode record {index}")]
    Encode {
        index: usize,
        #[source]
        error: serde_json::Error,
    },
    #[error("failed to write output")]
    Write(#[from] std::io::Error),
}

/// Line-delimited JSON writer over any async byte sink.
pub struct NdjsonSink<W> {
    writer: W,
    written: usize,
    buf: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> NdjsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            buf: Vec::new(),
        }
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub async fn write_record<T: Serialize>(&mut self, record: &T) -> Result<(), SinkError> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, record).map_err(|error| SinkError::Encode {
            index: self.written,
            error,
        })?;
        self.buf.push(b'\n');
        self.writer.write_all(&self.buf).await?;
        self.written += 1;
        Ok(())
    }

    pub async fn write_records<'a, T, I>(&mut self, records: I) -> Result<usize, SinkError>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let before = self.written;
        for record in records {
            self.write_record(record).await?;
        }
        Ok(self.written - before)
    }

    /// Flush and hand back the writer.
    pub async fn finish(mut self) -> Result<W, SinkError> {
        self.writer.flush().await?;
        Ok(self.writer)
    }
}
