//! Initial village: firms, workers and the opening workforce

use log::info;
use rand::Rng;

use crate::economy::firm::Firm;
use crate::economy::goods_market::MIN_PRICE;
use crate::economy::params::SimulationParams;
use crate::economy::person::Person;
use crate::economy::registry::Registry;
use crate::economy::sampling;
use crate::economy::types::{FirmId, DAYS_PER_YEAR};

/// Draw a duration in years and convert it to whole days
fn years_to_days<R: Rng>(rng: &mut R, mean: f64, variance: f64) -> u64 {
    let years = sampling::normal_from_variance(rng, mean, variance).max(0.0);
    (years * DAYS_PER_YEAR).round() as u64
}

/// Create the configured number of firms. Every firm starts with an
/// equal share of one day's demand in stock.
pub fn spawn_firms<R: Rng>(registry: &mut Registry, params: &SimulationParams, rng: &mut R) {
    let count = params.firm_count();
    let stock = params.total_population as f64 / count as f64;

    for _ in 0..count {
        let id = registry.next_firm_id();
        let funds = sampling::normal(rng, params.firm_funds_mean, params.firm_funds_std);
        let price = sampling::normal(rng, params.offered_price_mean, params.firm_price_std).max(MIN_PRICE);
        registry.insert_firm(Firm::new(id, funds, stock, price, params.employee_efficiency));
    }
}

/// Create the starting population with ages and lifetimes drawn in years
pub fn spawn_workers<R: Rng>(registry: &mut Registry, params: &SimulationParams, rng: &mut R) {
    for _ in 0..params.total_population {
        let id = registry.next_person_id();
        let age = years_to_days(rng, params.age_dist_mean, params.age_dist_variance);
        let lifetime = years_to_days(rng, params.lifetime_dist_mean, params.lifetime_dist_variance).max(1);
        registry.insert_person(Person::new(id, 0.0, age, lifetime));
    }
}

/// Employ the first `count` workers round-robin across the firms at `wage`.
/// Returns the number actually employed.
pub fn employ_round_robin(registry: &mut Registry, count: usize, wage: f64) -> usize {
    let firms: Vec<FirmId> = registry.firms().map(|f| f.id).collect();
    if firms.is_empty() {
        return 0;
    }
    let workers: Vec<_> = registry.persons().take(count).map(|p| p.id).collect();

    let mut employed = 0;
    for (i, worker) in workers.into_iter().enumerate() {
        if registry.hire(worker, firms[i % firms.len()], wage) {
            employed += 1;
        }
    }
    employed
}

/// Build the opening registry from validated parameters
pub fn populate<R: Rng>(params: &SimulationParams, rng: &mut R) -> Registry {
    let mut registry = Registry::new();
    spawn_firms(&mut registry, params, rng);
    spawn_workers(&mut registry, params, rng);
    let employed = employ_round_robin(&mut registry, params.employed_count(), params.initial_wage);

    info!(
        "village founded: {} workers, {} firms, {} employed",
        registry.population(),
        registry.firm_count(),
        employed
    );
    registry
}
