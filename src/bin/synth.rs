//! Emit a synthetic load trace.

use std::io::{self, BufWriter};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use pfreplay::*;
use pfreplay::synth::*;

#[derive(Parser, Debug)]
#[command(name = "synth", version, about = "Generate a synthetic load trace on stdout")]
struct Cli {
    /// Number of records
    #[arg(short, long, default_value_t = 100_000)]
    num: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of strided loads (strides of 1, 2, 3, ... blocks)
    #[arg(long, default_value_t = 2)]
    strides: usize,

    /// Number of pointer-chasing loads
    #[arg(long, default_value_t = 2)]
    chases: usize,

    /// Number of random loads
    #[arg(long, default_value_t = 1)]
    random: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut t = SynthTrace::new(cli.seed);
    for i in 0..cli.strides {
        t.add_stride((i as u64 + 1) << 24, i as i64 + 1, 4096);
    }
    for i in 0..cli.chases {
        t.add_chase((i as u64 + 1) << 32, 1 << 20, 256);
    }
    for i in 0..cli.random {
        t.add_random((i as u64 + 1) << 40, 1 << 24);
    }
    if t.num_loads() == 0 {
        return Err(Error::Config("no loads requested".to_string()));
    }

    let records = t.generate(cli.num);
    write_load_trace(BufWriter::new(io::stdout().lock()), &records)?;
    info!(records = records.len(), loads = t.num_loads(), "wrote synthetic trace");
    Ok(())
}
