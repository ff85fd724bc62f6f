//! Per-cycle snapshots and run reports (CSV tables, JSON summary)

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::economy::error::ReportError;
use crate::economy::types::{Cycle, FirmId};
use crate::economy::world::World;

pub const ECONOMIC_DATA_FILE: &str = "economicdatas.csv";
pub const UNEMPLOYMENT_FILE: &str = "unemploymentHistory.csv";
pub const FIRM_REVENUE_FILE: &str = "firm_revenu.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Everything recorded about one cycle
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleSnapshot {
    pub cycle: Cycle,
    pub gdp: f64,
    pub unemployment: f64,
    pub inflation: f64,
    pub population: usize,
    pub clearing_price: f64,
    pub matched_volume: f64,
    pub hires: u32,
    pub fires: usize,
    pub births: usize,
    pub age_deaths: usize,
    pub starvation_deaths: usize,
    pub active_firms: usize,
}

impl CycleSnapshot {
    pub fn gdp_per_capita(&self) -> f64 {
        if self.population > 0 {
            self.gdp / self.population as f64
        } else {
            0.0
        }
    }
}

/// Aggregate view of a finished run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub cycles: usize,
    pub final_population: usize,
    pub peak_population: usize,
    pub active_firms: usize,
    pub mean_gdp: f64,
    pub mean_unemployment: f64,
    pub final_unemployment: f64,
    pub final_clearing_price: f64,
    pub total_births: usize,
    pub total_age_deaths: usize,
    pub total_starvation_deaths: usize,
    pub total_hires: u64,
    pub total_fires: usize,
}

impl RunSummary {
    pub fn from_snapshots(seed: u64, snapshots: &[CycleSnapshot]) -> Self {
        let n = snapshots.len().max(1) as f64;
        let last = snapshots.last();

        RunSummary {
            seed,
            cycles: snapshots.len(),
            final_population: last.map(|s| s.population).unwrap_or(0),
            peak_population: snapshots.iter().map(|s| s.population).max().unwrap_or(0),
            active_firms: last.map(|s| s.active_firms).unwrap_or(0),
            mean_gdp: snapshots.iter().map(|s| s.gdp).sum::<f64>() / n,
            mean_unemployment: snapshots.iter().map(|s| s.unemployment).sum::<f64>() / n,
            final_unemployment: last.map(|s| s.unemployment).unwrap_or(0.0),
            final_clearing_price: last.map(|s| s.clearing_price).unwrap_or(0.0),
            total_births: snapshots.iter().map(|s| s.births).sum(),
            total_age_deaths: snapshots.iter().map(|s| s.age_deaths).sum(),
            total_starvation_deaths: snapshots.iter().map(|s| s.starvation_deaths).sum(),
            total_hires: snapshots.iter().map(|s| s.hires as u64).sum(),
            total_fires: snapshots.iter().map(|s| s.fires).sum(),
        }
    }
}

/// Daily macro table. Unemployment is a fraction, inflation a percentage.
pub fn economic_data_csv(snapshots: &[CycleSnapshot], cycle_scale: f64) -> String {
    let mut csv = String::from("Cycle,Year,DailyGDP,CyclyGDP,Population,GDPperCapita,Unemployment,Inflation\n");
    for snap in snapshots {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{},{}",
            snap.cycle.0,
            snap.cycle.year(cycle_scale),
            snap.gdp,
            snap.gdp / cycle_scale,
            snap.population,
            snap.gdp_per_capita(),
            snap.unemployment,
            snap.inflation * 100.0
        );
    }
    csv
}

/// Unemployment rate per cycle, in percent
pub fn unemployment_csv(history: &[f64]) -> String {
    let mut csv = String::from("Cycle,UnemploymentRate\n");
    for (i, rate) in history.iter().enumerate() {
        let _ = writeln!(csv, "{},{}", i + 1, rate * 100.0);
    }
    csv
}

/// One column per firm, one row per cycle; cycles a firm did not live
/// through read 0
pub fn firm_revenue_csv(revenues: &BTreeMap<FirmId, Vec<f64>>, cycles: usize) -> String {
    let header: Vec<String> = revenues.keys().map(|id| id.0.to_string()).collect();
    let mut csv = header.join(",");
    csv.push('\n');

    for cycle in 0..cycles {
        let row: Vec<String> = revenues
            .values()
            .map(|history| history.get(cycle).copied().unwrap_or(0.0).to_string())
            .collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    csv
}

fn write_file(path: PathBuf, contents: &str) -> Result<PathBuf, ReportError> {
    fs::write(&path, contents).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Write the three CSV tables and the JSON summary into `dir`, creating it
/// if needed. Returns the written paths.
pub fn write_reports(dir: &Path, world: &World, seed: u64) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let snapshots = world.snapshots();
    let summary = RunSummary::from_snapshots(seed, snapshots);
    let summary_json = serde_json::to_string_pretty(&summary)?;

    Ok(vec![
        write_file(
            dir.join(ECONOMIC_DATA_FILE),
            &economic_data_csv(snapshots, world.params().cycle_scale),
        )?,
        write_file(dir.join(UNEMPLOYMENT_FILE), &unemployment_csv(world.unemployment_history()))?,
        write_file(
            dir.join(FIRM_REVENUE_FILE),
            &firm_revenue_csv(&world.firm_revenue_history(), snapshots.len()),
        )?,
        write_file(dir.join(SUMMARY_FILE), &summary_json)?,
    ])
}
