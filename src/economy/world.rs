//! The village world and its daily cycle
//!
//! One call to [`World::step`] runs one day in a fixed order:
//! 1. firms restock and put their catch on the goods market
//! 2. workers collect wages and age; expired workers leave
//! 3. births
//! 4. firms below Q1 fire
//! 5. firms above Q3 post vacancies (plus the opening vacancies on day 1)
//! 6. labor market clears
//! 7. goods market clears
//! 8. GDP and unemployment
//! 9. hunger update and starvation
//! 10. price adaptation and inflation
//!
//! Firms left without employees are retired at the end of the day.

use std::collections::BTreeMap;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::economy::employment;
use crate::economy::error::ConfigError;
use crate::economy::firm::Firm;
use crate::economy::goods_market::GoodsMarket;
use crate::economy::labor_market::LaborMarket;
use crate::economy::params::SimulationParams;
use crate::economy::person::Person;
use crate::economy::population;
use crate::economy::pricing::{self, PriceSignals};
use crate::economy::registry::Registry;
use crate::economy::report::CycleSnapshot;
use crate::economy::setup;
use crate::economy::types::{Cycle, FirmId, PersonId};

/// Headline figures of one day
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CycleOutcome {
    pub cycle: Cycle,
    pub gdp: f64,
    pub unemployment: f64,
    pub inflation: f64,
}

/// Complete simulation state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    params: SimulationParams,
    registry: Registry,
    goods: GoodsMarket,
    labor: LaborMarket,
    signals: PriceSignals,
    /// Last completed day (0 before the first step)
    cycle: Cycle,
    unemployment_history: Vec<f64>,
    snapshots: Vec<CycleSnapshot>,
}

impl World {
    /// Validate the parameters and found the village
    pub fn initialize<R: Rng>(params: SimulationParams, rng: &mut R) -> Result<World, ConfigError> {
        params.validate()?;
        let registry = setup::populate(&params, rng);
        Ok(World::from_registry(params, registry))
    }

    /// Build a world from explicit firms and workers. Each `(worker, firm)`
    /// pair in `employment` is linked at the initial wage. A pair naming an
    /// unknown or already employed worker, or an unknown firm, is an error.
    pub fn with_agents(
        params: SimulationParams,
        firms: Vec<Firm>,
        persons: Vec<Person>,
        employment: &[(PersonId, FirmId)],
    ) -> Result<World, ConfigError> {
        params.validate()?;

        let mut registry = Registry::new();
        for firm in firms {
            registry.insert_firm(firm);
        }
        for person in persons {
            registry.insert_person(person);
        }
        for &(worker, firm) in employment {
            if !registry.hire(worker, firm, params.initial_wage) {
                return Err(ConfigError::invalid(
                    "employment",
                    format!("cannot employ worker {} at firm {}", worker, firm),
                ));
            }
        }
        Ok(World::from_registry(params, registry))
    }

    fn from_registry(params: SimulationParams, registry: Registry) -> World {
        let signals = PriceSignals::from_params(&params);
        World {
            goods: GoodsMarket::new(params.perceived_price_mean),
            labor: LaborMarket::new(),
            signals,
            cycle: Cycle::default(),
            unemployment_history: Vec::new(),
            snapshots: Vec::new(),
            params,
            registry,
        }
    }

    /// Run one day
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> CycleOutcome {
        let cycle = self.cycle.next();
        let params = &self.params;

        // 1. Supply
        self.goods.refresh_supply(&mut self.registry, &self.signals, params, rng);

        // 2-3. Wages, aging, births
        let age_deaths = population::advance_workers(&mut self.registry);
        let births = population::grow_population(&mut self.registry, params, rng);

        // 4-5. Employment policy
        let fired = employment::fire_underperformers(&mut self.registry, rng);
        if cycle == Cycle(1) {
            employment::post_initial_offers(&self.registry, &mut self.labor, params.initial_job_offer_count());
        }
        employment::post_vacancies(&self.registry, &mut self.labor);

        // 6. Labor market
        self.labor.collect_applications(&self.registry);
        let hiring = self.labor.clear(&mut self.registry, self.goods.clearing_price(), params);

        // 7. Goods market
        self.goods.collect_demand(&self.registry, &self.signals, params, rng);
        let sales = self.goods.clear(&mut self.registry, rng);

        // 8. GDP and unemployment
        let gdp: f64 = self.registry.firms_mut().map(|firm| firm.close_cycle()).sum();
        let population = self.registry.population();
        let unemployment = if population > 0 {
            self.registry.unemployed_count() as f64 / population as f64
        } else {
            0.0
        };
        self.unemployment_history.push(unemployment);

        // 9. Hunger
        population::record_meals(&mut self.registry, &self.goods);
        let starvation_deaths = population::remove_starved(&mut self.registry, params.max_starving_days);

        // 10. Prices
        self.signals.adapt(
            self.goods.aggregate_demand(),
            self.goods.aggregate_supply(),
            params,
            rng,
        );
        let inflation = pricing::inflation(self.goods.price_history());

        let retired = self.registry.retire_empty_firms();
        if !retired.is_empty() {
            debug!("{}: retired {} firms without staff", cycle, retired.len());
        }
        self.labor.reset();

        let snapshot = CycleSnapshot {
            cycle,
            gdp,
            unemployment,
            inflation,
            population: self.registry.population(),
            clearing_price: sales.clearing_price,
            matched_volume: sales.matched_volume,
            hires: hiring.hires,
            fires: fired.len(),
            births,
            age_deaths,
            starvation_deaths,
            active_firms: self.registry.firm_count(),
        };
        debug!(
            "{}: gdp {:.2}, unemployment {:.3}, inflation {:.4}, population {}, price {:.3}",
            cycle, gdp, unemployment, inflation, snapshot.population, snapshot.clearing_price
        );
        self.snapshots.push(snapshot);
        self.cycle = cycle;

        CycleOutcome {
            cycle,
            gdp,
            unemployment,
            inflation,
        }
    }

    /// Run `cycles` days
    pub fn run_cycles<R: Rng>(&mut self, cycles: u64, rng: &mut R) -> Vec<CycleOutcome> {
        (0..cycles).map(|_| self.step(rng)).collect()
    }

    /// Run the configured number of days
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Vec<CycleOutcome> {
        info!(
            "simulating {} days: {} workers, {} firms",
            self.params.total_cycles,
            self.population(),
            self.registry.firm_count()
        );
        let outcomes = self.run_cycles(self.params.total_cycles, rng);
        info!(
            "finished at {}: {} workers, {} firms, clearing price {:.3}",
            self.cycle,
            self.population(),
            self.registry.firm_count(),
            self.goods.clearing_price()
        );
        outcomes
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn goods_market(&self) -> &GoodsMarket {
        &self.goods
    }

    pub fn labor_market(&self) -> &LaborMarket {
        &self.labor
    }

    pub fn price_signals(&self) -> &PriceSignals {
        &self.signals
    }

    /// Last completed day
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    pub fn population(&self) -> usize {
        self.registry.population()
    }

    pub fn unemployment_history(&self) -> &[f64] {
        &self.unemployment_history
    }

    pub fn snapshots(&self) -> &[CycleSnapshot] {
        &self.snapshots
    }

    pub fn clearing_price_history(&self) -> &[f64] {
        self.goods.price_history()
    }

    /// Daily revenue of every firm that ever existed, retired ones included
    pub fn firm_revenue_history(&self) -> BTreeMap<FirmId, Vec<f64>> {
        self.registry
            .firms()
            .chain(self.registry.retired_firms())
            .map(|firm| (firm.id, firm.revenue_history().to_vec()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_world(seed: u64) -> (World, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let world = World::initialize(SimulationParams::small_village(), &mut rng).unwrap();
        (world, rng)
    }

    #[test]
    fn test_initialize_rejects_bad_params() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let params = SimulationParams {
            total_population: 0,
            ..SimulationParams::small_village()
        };
        assert!(World::initialize(params, &mut rng).is_err());
    }

    #[test]
    fn test_step_records_history() {
        let (mut world, mut rng) = small_world(42);
        let outcomes = world.run_cycles(10, &mut rng);

        assert_eq!(outcomes.len(), 10);
        assert_eq!(world.cycle(), Cycle(10));
        assert_eq!(world.unemployment_history().len(), 10);
        assert_eq!(world.snapshots().len(), 10);
        assert_eq!(world.clearing_price_history().len(), 11);
        assert!(world.clearing_price_history().iter().all(|&p| p > 0.0));
        assert!(world.registry().links_consistent());
    }

    #[test]
    fn test_gdp_matches_firm_revenue() {
        let (mut world, mut rng) = small_world(7);
        let outcome = world.step(&mut rng);

        let recorded: f64 = world
            .firm_revenue_history()
            .values()
            .filter_map(|h| h.first())
            .sum();
        assert!((outcome.gdp - recorded).abs() < 1e-9);
        assert!(outcome.gdp > 0.0);
    }

    #[test]
    fn test_unemployment_in_unit_range() {
        let (mut world, mut rng) = small_world(3);
        for outcome in world.run_cycles(30, &mut rng) {
            assert!((0.0..=1.0).contains(&outcome.unemployment));
        }
    }

    #[test]
    fn test_matched_volume_bounded() {
        let (mut world, mut rng) = small_world(5);
        for _ in 0..20 {
            world.step(&mut rng);
            let snap = world.snapshots().last().unwrap();
            let goods = world.goods_market();
            assert!(snap.matched_volume <= goods.aggregate_supply().min(goods.aggregate_demand()) + 1e-9);
            assert!(goods.purchases().values().all(|&q| q == 1.0));
        }
    }

    #[test]
    fn test_with_agents_rejects_unknown_employment() {
        let params = SimulationParams::small_village();
        let firms = vec![Firm::new(FirmId(0), 100.0, 10.0, 5.0, 2.0)];
        let persons = vec![Person::new(PersonId(0), 0.0, 0, 1000)];

        let build = |pairs: &[(PersonId, FirmId)]| {
            World::with_agents(params.clone(), firms.clone(), persons.clone(), pairs)
        };

        let ghost_worker = build(&[(PersonId(7), FirmId(0))]);
        assert!(matches!(ghost_worker, Err(ConfigError::Invalid { field: "employment", .. })));
        let ghost_firm = build(&[(PersonId(0), FirmId(3))]);
        assert!(matches!(ghost_firm, Err(ConfigError::Invalid { field: "employment", .. })));
        assert!(build(&[(PersonId(0), FirmId(0)), (PersonId(0), FirmId(0))]).is_err());

        let world = build(&[(PersonId(0), FirmId(0))]).unwrap();
        assert_eq!(world.registry().person(PersonId(0)).unwrap().employer(), Some(FirmId(0)));
    }

    #[test]
    fn test_empty_village_keeps_running() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let params = SimulationParams {
            annual_birth_rate: 0.0,
            ..SimulationParams::small_village()
        };
        let mut world = World::with_agents(params, Vec::new(), Vec::new(), &[]).unwrap();
        let outcome = world.step(&mut rng);
        assert_eq!(outcome.gdp, 0.0);
        assert_eq!(outcome.unemployment, 0.0);
        assert_eq!(outcome.inflation, 0.0);
    }
}
