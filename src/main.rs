use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clickstream_etl::pipeline::{self, RunOptions};
use clickstream_etl::{Config, DatasetSource, InputFormat};

#[derive(Parser)]
#[command(
    name = "clickstream-etl",
    about = "Transform raw clickstream events into canonical records (NDJSON out)"
)]
struct Cli {
    /// Raw dataset: a JSON object, a JSON array, or NDJSON. `-` or omitted reads stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output NDJSON file. Omitted writes to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config layered over the built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input format; overrides `[input] format`.
    #[arg(long)]
    format: Option<InputFormat>,

    /// Worker partitions. Defaults to the available parallelism.
    #[arg(long)]
    partitions: Option<usize>,

    /// Project id written to records that carry none.
    #[arg(long)]
    project_id: Option<String>,

    /// Keep `device.ua_*` empty instead of decoding the User-Agent.
    #[arg(long)]
    no_ua_parsing: bool,

    /// Write debug logs to /tmp/clickstream-etl-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(project_id) = cli.project_id {
        config.transform.project_id = project_id;
    }
    if cli.no_ua_parsing {
        config.transform.parse_user_agent = false;
    }

    init_tracing(cli.debug, &config.logging.filter)?;

    let opts = RunOptions {
        source: DatasetSource::from_arg(cli.input),
        output: cli.output,
        format: cli.format.unwrap_or(config.input.format),
        partitions: cli.partitions.unwrap_or_else(pipeline::default_partitions),
    };

    pipeline::run(&config, &opts).await?;
    Ok(())
}

/// Logs go to stderr so stdout stays clean NDJSON.
fn init_tracing(debug: bool, default_filter: &str) -> anyhow::Result<()> {
    let filter = |fallback: &str| {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback))
    };

    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/clickstream-etl-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(filter("debug"))
            .init();
        tracing::info!("clickstream-etl debug log started, tail -f /tmp/clickstream-etl-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter(default_filter))
            .init();
    }
    Ok(())
}
