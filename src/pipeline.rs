//! Pipeline: one driver run: read, decode, transform in partitions, write.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clickstream_core::{
    parse_dataset, CanonicalEventRecord, Config, Dataset, InputFormat, RawEventRecord, Transformer,
};
use clickstream_io::{DatasetSource, NdjsonSink};
use tokio::io::AsyncWrite;
use tracing::{info, warn};

/// Everything a run needs besides the config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: DatasetSource,
    /// `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub format: InputFormat,
    pub partitions: usize,
}

/// What a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub input_records: usize,
    pub output_records: usize,
    pub corrupt_records: usize,
    pub partitions: usize,
}

/// Number of workers to use when none is configured.
pub fn default_partitions() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Map `input` on the blocking pool, one task per partition, and concatenate
/// the results in partition order.
pub async fn transform_partitioned(
    transformer: Arc<Transformer>,
    input: Dataset<RawEventRecord>,
    partitions: usize,
) -> anyhow::Result<Dataset<CanonicalEventRecord>> {
    let tasks = input.partitions(partitions).into_iter().map(|part| {
        let transformer = Arc::clone(&transformer);
        tokio::task::spawn_blocking(move || transformer.transform(&part))
    });

    let parts = futures::future::try_join_all(tasks)
        .await
        .context("transform worker failed")?;
    Ok(Dataset::concat(parts))
}

/// Execute one run with `config`, writing NDJSON to the configured output.
pub async fn run(config: &Config, opts: &RunOptions) -> anyhow::Result<RunSummary> {
    let text = opts.source.read_to_string().await?;
    let input = parse_dataset(&text, opts.format)
        .with_context(|| format!("cannot decode dataset from {}", opts.source.name()))?;

    let input_records = input.len();
    let corrupt_records = input.iter().filter(|raw| raw.is_corrupt()).count();
    if corrupt_records > 0 {
        warn!(corrupt_records, "dataset contains undecodable records; emitting defaults for them");
    }

    let partitions = opts.partitions.max(1).min(input_records.max(1));
    let transformer = Arc::new(Transformer::new(config.transform.clone()));
    let output = transform_partitioned(transformer, input, partitions).await?;

    anyhow::ensure!(
        output.len() == input_records,
        "record count changed during transform: {} in, {} out",
        input_records,
        output.len()
    );

    let output_records = match &opts.output {
        Some(path) => {
            let file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("cannot create {}", path.display()))?;
            write_output(file, &output).await?
        }
        None => write_output(tokio::io::stdout(), &output).await?,
    };

    let summary = RunSummary {
        input_records,
        output_records,
        corrupt_records,
        partitions,
    };
    info!(?summary, source = %opts.source.name(), "run complete");
    Ok(summary)
}

async fn write_output<W>(writer: W, records: &Dataset<CanonicalEventRecord>) -> anyhow::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut sink = NdjsonSink::new(writer);
    let written = sink.write_records(records).await?;
    sink.finish().await?;
    Ok(written)
}
