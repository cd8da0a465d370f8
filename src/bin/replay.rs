//! Replay a load trace through a predictor and write the predictions.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use pfreplay::*;

#[derive(Parser, Debug)]
#[command(name = "replay", version, about = "Replay a load trace through a prefetch predictor")]
struct Cli {
    /// Load trace to replay
    load_trace: PathBuf,

    /// Output prediction trace (stdout when omitted)
    output: Option<PathBuf>,

    /// JSON configuration file; other options override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    predictor: Option<PredictorKind>,

    /// Start of the training window (millions of instructions)
    #[arg(long)]
    start: Option<u64>,

    /// End of the training window (millions of instructions)
    #[arg(long)]
    stop_train: Option<u64>,

    /// Print statistics for the N most common PCs
    #[arg(long, default_value_t = 0)]
    top: usize,
}

fn load_config(cli: &Cli) -> Result<ReplayConfig> {
    let mut cfg = match &cli.config {
        Some(path) => ReplayConfig::from_file(path)?,
        None => ReplayConfig::default(),
    };
    if let Some(p) = cli.predictor { cfg.predictor = p; }
    if let Some(s) = cli.start { cfg.start = s; }
    if let Some(s) = cli.stop_train { cfg.stop_train = s; }
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli)?;
    let window = cfg.window();
    info!(?cfg, trace = %cli.load_trace.display(), "starting replay");

    let predictor = cfg.predictor.build(window.start_id);
    let mut replay = Replay::new(predictor, window)
        .with_progress_interval(cfg.progress_interval);
    if cli.top > 0 {
        replay = replay.with_pc_stats();
    }

    let out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    // Records are streamed; the first malformed line stops the replay
    let file = File::open(&cli.load_trace)?;
    let reader = LoadTraceReader::new(BufReader::new(file));
    let n = itertools::process_results(reader, |records| {
        write_predictions(out, replay.run(records))
    })??;

    let stats = replay.stats();
    info!(predictions = n, coverage = stats.coverage(), "wrote predictions");
    for (pc, s) in stats.top_pcs(cli.top) {
        eprintln!("{:016x}: {:8} occ {:8} issued ({:.4}) streak={:6} {}",
            pc, s.occ, s.issued, s.coverage(), s.longest_streak(),
            s.recent_pattern(32));
    }
    Ok(())
}
