//! Labor market
//!
//! Firms post vacancies, searching workers apply. Each posting, in the order
//! it was submitted, takes the earliest unmatched applications of its sector
//! until its vacancies are filled.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::economy::params::SimulationParams;
use crate::economy::registry::Registry;
use crate::economy::types::{FirmId, PersonId, Sector, SkillProfile};

/// Vacancies published by one firm
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub firm: FirmId,
    pub sector: Sector,
    pub requirements: SkillProfile,
    pub vacancies: u32,
    pub recruiting: bool,
}

impl JobPosting {
    pub fn new(firm: FirmId, vacancies: u32) -> Self {
        JobPosting {
            firm,
            sector: Sector::Fishing,
            requirements: SkillProfile::default(),
            vacancies,
            recruiting: vacancies > 0,
        }
    }
}

/// A searching worker's application
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub worker: PersonId,
    pub sector: Sector,
    pub profile: SkillProfile,
    pub matched: bool,
}

/// Result of one clearing round
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborClearing {
    pub hires: u32,
    pub clearing_wage: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LaborMarket {
    postings: Vec<JobPosting>,
    applications: Vec<JobApplication>,
    aggregate_supply: u64,
    aggregate_demand: u64,
    clearing_wage: f64,
    matched: u32,
}

impl LaborMarket {
    pub fn new() -> Self {
        LaborMarket::default()
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn applications(&self) -> &[JobApplication] {
        &self.applications
    }

    /// Vacancies posted this cycle
    pub fn aggregate_supply(&self) -> u64 {
        self.aggregate_supply
    }

    /// Applications received this cycle
    pub fn aggregate_demand(&self) -> u64 {
        self.aggregate_demand
    }

    pub fn clearing_wage(&self) -> f64 {
        self.clearing_wage
    }

    /// Hires made by the last clearing
    pub fn matched(&self) -> u32 {
        self.matched
    }

    pub fn post(&mut self, posting: JobPosting) {
        self.aggregate_supply += posting.vacancies as u64;
        self.postings.push(posting);
    }

    pub fn apply(&mut self, worker: PersonId, sector: Sector, profile: SkillProfile) {
        self.aggregate_demand += 1;
        self.applications.push(JobApplication {
            worker,
            sector,
            profile,
            matched: false,
        });
    }

    /// Every searching worker files one application
    pub fn collect_applications(&mut self, registry: &Registry) {
        for person in registry.persons().filter(|p| p.is_searching()) {
            self.apply(person.id, person.sector, person.profile);
        }
    }

    /// Match postings against applications and hire through the registry.
    ///
    /// The clearing wage is the fish price times the mean daily order;
    /// hired workers earn `hire_wage_multiplier` times that.
    pub fn clear(
        &mut self,
        registry: &mut Registry,
        fish_price: f64,
        params: &SimulationParams,
    ) -> LaborClearing {
        self.clearing_wage = fish_price * params.mean_fish_order;
        let wage = self.clearing_wage * params.hire_wage_multiplier;
        let mut hires = 0;

        for posting in self.postings.iter_mut() {
            if !posting.recruiting {
                continue;
            }
            for application in self.applications.iter_mut() {
                if posting.vacancies == 0 {
                    break;
                }
                if application.matched || application.sector != posting.sector {
                    continue;
                }
                if registry.hire(application.worker, posting.firm, wage) {
                    application.matched = true;
                    posting.vacancies -= 1;
                    hires += 1;
                }
            }
            if posting.vacancies == 0 {
                posting.recruiting = false;
            }
        }

        self.matched = hires;
        debug!(
            "labor market: {} vacancies, {} applicants, {} hired at {:.3}",
            self.aggregate_supply, self.aggregate_demand, hires, wage
        );

        LaborClearing {
            hires,
            clearing_wage: self.clearing_wage,
        }
    }

    /// Drop this cycle's postings and applications
    pub fn reset(&mut self) {
        self.postings.clear();
        self.applications.clear();
        self.aggregate_supply = 0;
        self.aggregate_demand = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::firm::Firm;
    use crate::economy::person::Person;

    fn registry_with(persons: u64, firms: u64) -> Registry {
        let mut registry = Registry::new();
        for _ in 0..firms {
            let id = registry.next_firm_id();
            registry.insert_firm(Firm::new(id, 100.0, 0.0, 5.0, 2.0));
        }
        for _ in 0..persons {
            let id = registry.next_person_id();
            registry.insert_person(Person::new(id, 0.0, 0, 1000));
        }
        registry
    }

    #[test]
    fn test_first_fit_in_submission_order() {
        let mut registry = registry_with(5, 2);
        let mut market = LaborMarket::new();
        market.post(JobPosting::new(FirmId(1), 2));
        market.post(JobPosting::new(FirmId(0), 1));
        market.collect_applications(&registry);

        let result = market.clear(&mut registry, 4.0, &SimulationParams::default());
        assert_eq!(result.hires, 3);
        assert_eq!(registry.person(PersonId(0)).unwrap().employer(), Some(FirmId(1)));
        assert_eq!(registry.person(PersonId(1)).unwrap().employer(), Some(FirmId(1)));
        assert_eq!(registry.person(PersonId(2)).unwrap().employer(), Some(FirmId(0)));
        assert_eq!(registry.person(PersonId(3)).unwrap().employer(), None);
        assert!(market.postings().iter().all(|p| !p.recruiting));
        assert!(registry.links_consistent());
    }

    #[test]
    fn test_hire_wage_follows_fish_price() {
        let mut registry = registry_with(1, 1);
        let mut market = LaborMarket::new();
        market.post(JobPosting::new(FirmId(0), 1));
        market.collect_applications(&registry);

        let params = SimulationParams {
            mean_fish_order: 1.0,
            hire_wage_multiplier: 1.5,
            ..SimulationParams::default()
        };
        let result = market.clear(&mut registry, 4.0, &params);
        assert_eq!(result.clearing_wage, 4.0);
        assert_eq!(registry.person(PersonId(0)).unwrap().wage, 6.0);
        assert!(!registry.person(PersonId(0)).unwrap().is_searching());
    }

    #[test]
    fn test_more_vacancies_than_applicants() {
        let mut registry = registry_with(2, 1);
        let mut market = LaborMarket::new();
        market.post(JobPosting::new(FirmId(0), 5));
        market.collect_applications(&registry);

        let result = market.clear(&mut registry, 5.0, &SimulationParams::default());
        assert_eq!(result.hires, 2);
        assert_eq!(market.postings()[0].vacancies, 3);
        assert!(market.postings()[0].recruiting);
        assert_eq!(market.aggregate_supply(), 5);
        assert_eq!(market.aggregate_demand(), 2);
    }

    #[test]
    fn test_employed_workers_do_not_apply() {
        let mut registry = registry_with(3, 1);
        registry.hire(PersonId(1), FirmId(0), 5.0);
        let mut market = LaborMarket::new();
        market.collect_applications(&registry);
        assert_eq!(market.applications().len(), 2);

        market.reset();
        assert!(market.applications().is_empty());
        assert_eq!(market.aggregate_demand(), 0);
    }
}
