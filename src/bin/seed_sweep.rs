//! Run one parameter file under many seeds and print the aggregate report

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use fishing_village::economy::harness::{run_batch, BatchConfig};
use fishing_village::economy::SimulationParams;

#[derive(Parser, Debug)]
#[command(name = "seed_sweep")]
#[command(about = "Run the village under several seeds and compare outcomes")]
struct Args {
    /// Parameters file (keyword `name value` lines, or .json)
    params: PathBuf,

    /// Number of runs
    #[arg(short, long, default_value = "8")]
    runs: u32,

    /// Seed of the first run; run i uses base_seed + i
    #[arg(short, long, default_value = "0")]
    base_seed: u64,

    /// Override the number of simulated days
    #[arg(short, long)]
    cycles: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().filter(None, LevelFilter::Warn).parse_default_env().init();
    let args = Args::parse();

    let mut params = SimulationParams::from_path(&args.params)?;
    if let Some(cycles) = args.cycles {
        params.total_cycles = cycles;
    }

    let config = BatchConfig {
        name: args.params.display().to_string(),
        params,
        num_runs: args.runs,
        base_seed: args.base_seed,
    };

    println!("=== Seed Sweep ===");
    println!(
        "Runs: {} (seeds {}..{})",
        config.num_runs,
        config.base_seed,
        config.seed_for(config.num_runs)
    );
    println!();

    let results = run_batch(&config)?;
    print!("{}", results.report());

    Ok(())
}
