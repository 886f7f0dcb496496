use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ironbrc::metrics::{names, GaugeMetric, MetricsCollector};
use ironbrc::testing::write_measurements;
use ironbrc::{Report, RunConfig, Runner};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ironbrc", version)]
#[command(about = "Per-station min/mean/max over a `<station>;<value>` measurements file")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate a measurements file and print the report.
    Aggregate(AggregateArgs),
    /// Write a file of generated measurements.
    Generate(GenerateArgs),
}

#[derive(Args)]
struct AggregateArgs {
    /// Measurements file; omit or pass `-` to read stdin.
    input: Option<PathBuf>,

    #[arg(long, help = "JSON run configuration; flags override its values")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Worker threads (default: available processors)")]
    workers: Option<usize>,

    #[arg(long, help = "Bytes per chunk when reading stdin")]
    chunk_size: Option<usize>,

    #[arg(long, help = "Aggregate on a single thread")]
    sequential: bool,

    #[arg(long, help = "Buffer values per station and reduce them in bulk")]
    buffered: bool,

    #[arg(long, help = "Print the report as JSON")]
    json: bool,

    #[arg(long, help = "Print elapsed time and counters to stderr")]
    timings: bool,

    #[arg(long, value_name = "PATH", help = "Write run metrics as JSON to PATH")]
    metrics_out: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of lines; `_` separators are allowed (`1_000_000_000`).
    #[arg(value_parser = parse_count)]
    rows: u64,

    #[arg(short, long, default_value = "measurements.txt")]
    output: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn parse_count(s: &str) -> Result<u64, String> {
    s.replace('_', "")
        .parse()
        .map_err(|e| format!("invalid row count {s:?}: {e}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Aggregate(args) => aggregate(args),
        Command::Generate(args) => generate(&args),
    }
}

fn aggregate(args: AggregateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if args.workers.is_some() {
        config.worker_count = args.workers;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size_hint = chunk_size;
    }
    config.sequential |= args.sequential;
    config.buffered |= args.buffered;

    let metrics = MetricsCollector::new();
    let runner = Runner::from_config(&config)
        .context("invalid run configuration")?
        .with_metrics(metrics.clone());

    let report = match args.input.as_deref() {
        None => runner.run_reader(io::stdin().lock()),
        Some(path) if path.as_os_str() == "-" => runner.run_reader(io::stdin().lock()),
        Some(path) => runner.run_file(path),
    }
    .context("aggregation failed")?;

    print_report(&report, args.json)?;

    if let (Some(elapsed), Some(bytes)) = (metrics.elapsed(), metrics.counter(names::BYTES)) {
        #[allow(clippy::cast_precision_loss)]
        let mib_per_sec = bytes as f64 / (1024.0 * 1024.0) / elapsed.as_secs_f64().max(1e-9);
        metrics.register(Box::new(
            GaugeMetric::new("throughput", mib_per_sec).with_description("MiB/s"),
        ));
    }
    if args.timings {
        metrics.write_summary(&mut io::stderr().lock())?;
    }
    if let Some(path) = &args.metrics_out {
        metrics
            .save_to_file(path)
            .with_context(|| format!("write metrics {}", path.display()))?;
    }
    Ok(())
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{report}")?;
    }
    out.flush()?;
    Ok(())
}

fn generate(args: &GenerateArgs) -> Result<()> {
    info!(rows = args.rows, output = %args.output.display(), seed = args.seed, "generating measurements");
    write_measurements(&args.output, args.rows, args.seed)
}
