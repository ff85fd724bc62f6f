//! Multi-seed batch runs.
//!
//! Runs the same parameters under N seeds, one independent world per seed,
//! and aggregates the run summaries. Runs execute in parallel with rayon;
//! each owns its generator so results do not depend on scheduling.

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::economy::error::ConfigError;
use crate::economy::params::SimulationParams;
use crate::economy::report::RunSummary;
use crate::economy::world::World;

/// Configuration for a batch of simulation runs.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    pub name: String,
    pub params: SimulationParams,
    pub num_runs: u32,
    pub base_seed: u64,
}

impl BatchConfig {
    /// Seed of run `run`; wraps past `u64::MAX`
    pub fn seed_for(&self, run: u32) -> u64 {
        self.base_seed.wrapping_add(run as u64)
    }
}

/// Results collected from a batch of runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchResults {
    pub name: String,
    pub summaries: Vec<RunSummary>,
    pub mean_gdp: f64,
    pub stddev_gdp: f64,
    pub mean_unemployment: f64,
    pub mean_final_population: f64,
    pub min_final_population: usize,
    pub max_final_population: usize,
}

impl BatchResults {
    /// Mean daily GDP of each run, in seed order.
    pub fn gdp_per_run(&self) -> Vec<f64> {
        self.summaries.iter().map(|s| s.mean_gdp).collect()
    }

    /// Report aggregate results.
    pub fn report(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("=== Batch: {} ({} runs) ===\n", self.name, self.summaries.len()));
        s.push_str(&format!("Mean daily GDP:    {:.2} +/- {:.2}\n", self.mean_gdp, self.stddev_gdp));
        s.push_str(&format!("Mean unemployment: {:.1}%\n", self.mean_unemployment * 100.0));
        s.push_str(&format!(
            "Final population:  {:.1} (min {}, max {})\n",
            self.mean_final_population, self.min_final_population, self.max_final_population
        ));

        let n = self.summaries.len().max(1) as f64;
        let births = self.summaries.iter().map(|r| r.total_births).sum::<usize>() as f64 / n;
        let age_deaths = self.summaries.iter().map(|r| r.total_age_deaths).sum::<usize>() as f64 / n;
        let starved = self.summaries.iter().map(|r| r.total_starvation_deaths).sum::<usize>() as f64 / n;
        let price = self.summaries.iter().map(|r| r.final_clearing_price).sum::<f64>() / n;

        s.push_str("\n  Avg per run:\n");
        s.push_str(&format!("    Births:            {:.1}\n", births));
        s.push_str(&format!("    Deaths (age):      {:.1}\n", age_deaths));
        s.push_str(&format!("    Deaths (hunger):   {:.1}\n", starved));
        s.push_str(&format!("    Final fish price:  {:.3}\n", price));

        s.push_str("\n  Runs:\n");
        for run in &self.summaries {
            s.push_str(&format!(
                "    seed {:>6}: gdp {:>9.2}  unemployment {:>5.1}%  population {:>6}\n",
                run.seed,
                run.mean_gdp,
                run.mean_unemployment * 100.0,
                run.final_population
            ));
        }
        s
    }
}

/// Run one world to completion and summarize it
pub fn run_single(params: &SimulationParams, seed: u64) -> Result<RunSummary, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut world = World::initialize(params.clone(), &mut rng)?;
    world.run(&mut rng);
    Ok(RunSummary::from_snapshots(seed, world.snapshots()))
}

/// Run a batch of N simulations, collecting one summary per run.
pub fn run_batch(config: &BatchConfig) -> Result<BatchResults, ConfigError> {
    config.params.validate()?;
    info!("batch {}: {} runs from seed {}", config.name, config.num_runs, config.base_seed);

    let summaries = (0..config.num_runs)
        .into_par_iter()
        .map(|run| run_single(&config.params, config.seed_for(run)))
        .collect::<Result<Vec<_>, _>>()?;

    let gdps: Vec<f64> = summaries.iter().map(|s| s.mean_gdp).collect();
    let n = gdps.len().max(1) as f64;
    let mean = gdps.iter().sum::<f64>() / n;
    let variance = gdps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);
    let mean_unemployment = summaries.iter().map(|s| s.mean_unemployment).sum::<f64>() / n;
    let mean_final_population = summaries.iter().map(|s| s.final_population as f64).sum::<f64>() / n;

    Ok(BatchResults {
        name: config.name.clone(),
        min_final_population: summaries.iter().map(|s| s.final_population).min().unwrap_or(0),
        max_final_population: summaries.iter().map(|s| s.final_population).max().unwrap_or(0),
        summaries,
        mean_gdp: mean,
        stddev_gdp: variance.sqrt(),
        mean_unemployment,
        mean_final_population,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_batch(runs: u32) -> BatchConfig {
        BatchConfig {
            name: "tiny".to_string(),
            params: SimulationParams {
                total_cycles: 15,
                ..SimulationParams::small_village()
            },
            num_runs: runs,
            base_seed: 100,
        }
    }

    #[test]
    fn test_batch_is_seed_ordered_and_repeatable() {
        let first = run_batch(&tiny_batch(4)).unwrap();
        let second = run_batch(&tiny_batch(4)).unwrap();

        let seeds: Vec<u64> = first.summaries.iter().map(|s| s.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103]);
        assert_eq!(first.summaries, second.summaries);
        assert!(first.min_final_population <= first.max_final_population);
    }

    #[test]
    fn test_report_lists_runs() {
        let results = run_batch(&tiny_batch(2)).unwrap();
        let report = results.report();
        assert!(report.contains("=== Batch: tiny (2 runs) ==="));
        assert!(report.contains("seed    100"));
        assert!(report.contains("seed    101"));
    }

    #[test]
    fn test_seeds_wrap_near_max() {
        let config = BatchConfig {
            base_seed: u64::MAX - 1,
            ..tiny_batch(4)
        };
        assert_eq!(config.seed_for(0), u64::MAX - 1);
        assert_eq!(config.seed_for(1), u64::MAX);
        assert_eq!(config.seed_for(2), 0);
        assert_eq!(config.seed_for(config.num_runs), 2);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut config = tiny_batch(2);
        config.params.total_firms = 0.0;
        assert!(run_batch(&config).is_err());
    }
}
