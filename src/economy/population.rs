//! Population lifecycle: wages and aging, births, starvation

use log::debug;
use rand::Rng;

use crate::economy::agent::{Agent, StepOutcome};
use crate::economy::goods_market::GoodsMarket;
use crate::economy::params::SimulationParams;
use crate::economy::person::Person;
use crate::economy::registry::Registry;
use crate::economy::sampling;
use crate::economy::types::{PersonId, DAYS_PER_YEAR};

/// Step every worker (wage credit, one day older) and remove those whose
/// lifetime ran out. Returns the number of deaths.
pub fn advance_workers(registry: &mut Registry) -> usize {
    let mut expired: Vec<PersonId> = Vec::new();
    for person in registry.persons_mut() {
        if Agent::Person(&mut *person).step() == StepOutcome::Expired {
            expired.push(person.id);
        }
    }

    for &id in &expired {
        registry.remove_person(id);
    }
    expired.len()
}

/// Expected number of births in one day
pub fn expected_births(population: usize, annual_birth_rate: f64) -> f64 {
    annual_birth_rate / DAYS_PER_YEAR * population as f64
}

/// Draw today's births and add the newborns. Returns how many were born.
pub fn grow_population<R: Rng>(
    registry: &mut Registry,
    params: &SimulationParams,
    rng: &mut R,
) -> usize {
    let expected = expected_births(registry.population(), params.annual_birth_rate);
    let births = sampling::poisson(rng, expected) as usize;

    for _ in 0..births {
        let id = registry.next_person_id();
        registry.insert_person(Person::newborn(id, params.newborn_lifetime_days));
    }
    if births > 0 {
        debug!("{} births (expected {:.3})", births, expected);
    }
    births
}

/// Update every worker's hunger counter from today's purchase ledger
pub fn record_meals(registry: &mut Registry, goods: &GoodsMarket) {
    for person in registry.persons_mut() {
        person.record_meal(goods.purchased(person.id));
    }
}

/// Remove workers that went `max_starving_days` days without fish.
/// Returns the number removed.
pub fn remove_starved(registry: &mut Registry, max_starving_days: u32) -> usize {
    let starved = registry.remove_persons_where(|p| p.days_without_food >= max_starving_days);
    if starved > 0 {
        debug!("{} workers starved", starved);
    }
    starved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::firm::Firm;
    use crate::economy::goods_market::{FishOffer, FishOrder};
    use crate::economy::types::{FirmId, Sector};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_workers_die_at_lifetime() {
        let mut registry = Registry::new();
        let fid = registry.next_firm_id();
        registry.insert_firm(Firm::new(fid, 0.0, 0.0, 5.0, 2.0));
        for lifetime in [1, 2, 50] {
            let id = registry.next_person_id();
            registry.insert_person(Person::new(id, 0.0, 0, lifetime));
            registry.hire(id, fid, 3.0);
        }

        assert_eq!(advance_workers(&mut registry), 1);
        assert_eq!(registry.population(), 2);
        assert_eq!(registry.person(PersonId(1)).unwrap().funds, 3.0);
        assert_eq!(advance_workers(&mut registry), 1);
        assert_eq!(registry.firm(fid).unwrap().employee_count(), 1);
        assert!(registry.links_consistent());
    }

    #[test]
    fn test_births_follow_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut registry = Registry::new();
        for _ in 0..1000 {
            let id = registry.next_person_id();
            registry.insert_person(Person::new(id, 0.0, 0, 100_000));
        }
        let params = SimulationParams {
            annual_birth_rate: 36.5,
            ..SimulationParams::default()
        };

        // 0.1 per person per day: about 100 expected
        let births = grow_population(&mut registry, &params, &mut rng);
        assert!((60..=140).contains(&births), "births was {}", births);
        assert_eq!(registry.population(), 1000 + births);

        let newborn = registry.persons().last().unwrap();
        assert_eq!(newborn.age, 0);
        assert_eq!(newborn.funds, 0.0);
        assert_eq!(newborn.lifetime, params.newborn_lifetime_days);
        assert!(newborn.is_searching());
    }

    #[test]
    fn test_no_births_without_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut registry = Registry::new();
        let params = SimulationParams {
            annual_birth_rate: 0.0,
            ..SimulationParams::default()
        };
        assert_eq!(grow_population(&mut registry, &params, &mut rng), 0);
    }

    #[test]
    fn test_starvation_exactly_at_threshold() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut registry = Registry::new();
        let fid = registry.next_firm_id();
        registry.insert_firm(Firm::new(fid, 0.0, 1.0, 1.0, 2.0));
        let fed = registry.next_person_id();
        registry.insert_person(Person::new(fed, 10.0, 0, 100));
        let hungry = registry.next_person_id();
        let mut person = Person::new(hungry, 0.0, 0, 100);
        person.days_without_food = 2;
        registry.insert_person(person);

        let mut goods = GoodsMarket::new(1.0);
        goods.submit_offer(FishOffer {
            firm: fid,
            sector: Sector::Fishing,
            price: 1.0,
            quantity: 1.0,
        });
        goods.submit_order(FishOrder::new(fed, 2.0, false, 10.0));
        goods.clear(&mut registry, &mut rng);

        record_meals(&mut registry, &goods);
        assert_eq!(registry.person(fed).unwrap().days_without_food, 0);
        assert_eq!(registry.person(hungry).unwrap().days_without_food, 3);

        assert_eq!(remove_starved(&mut registry, 4), 0);
        assert_eq!(remove_starved(&mut registry, 3), 1);
        assert!(registry.person(hungry).is_none());
        assert_eq!(registry.firm(FirmId(0)).unwrap().revenue(), 1.0);
    }
}
