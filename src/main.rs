use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use fishing_village::economy::report::{self, RunSummary};
use fishing_village::economy::{SimulationParams, World};

#[derive(Parser, Debug)]
#[command(name = "fishing_village")]
#[command(about = "Simulate the economy of a small fishing village")]
struct Args {
    /// Parameters file (keyword `name value` lines, or .json)
    params: PathBuf,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of simulated days
    #[arg(short, long)]
    cycles: Option<u64>,

    /// Directory for the CSV tables and summary.json
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip writing report files
    #[arg(long)]
    no_files: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().filter(None, LevelFilter::Info).parse_default_env().init();
    let args = Args::parse();

    let mut params = SimulationParams::from_path(&args.params)?;
    if let Some(cycles) = args.cycles {
        params.total_cycles = cycles;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    println!("Simulating fishing village with seed: {}", seed);
    println!("Days to simulate: {}", params.total_cycles);
    println!("Initial workers: {}", params.total_population);
    println!("Firms: {}", params.firm_count());
    println!("--------------------------");

    let mut world = World::initialize(params, &mut rng)?;
    world.run(&mut rng);

    let summary = RunSummary::from_snapshots(seed, world.snapshots());
    println!("Final population: {} (peak {})", summary.final_population, summary.peak_population);
    println!("Active firms: {}", summary.active_firms);
    println!("Mean daily GDP: {:.2}", summary.mean_gdp);
    println!("Mean unemployment: {:.1}%", summary.mean_unemployment * 100.0);
    println!("Final fish price: {:.3}", summary.final_clearing_price);
    println!(
        "Births: {}, deaths (age): {}, deaths (hunger): {}",
        summary.total_births, summary.total_age_deaths, summary.total_starvation_deaths
    );

    if !args.no_files {
        for path in report::write_reports(&args.output_dir, &world, seed)? {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
