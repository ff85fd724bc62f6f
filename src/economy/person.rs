//! Workers of the village

use serde::{Deserialize, Serialize};

use crate::economy::types::{FirmId, PersonId, Sector, SkillProfile};

/// A worker (fisherman)
///
/// The `employer` field is one half of the employer/employee link and is
/// only written through [`crate::economy::registry`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub funds: f64,
    /// Age in days
    pub age: u64,
    /// Maximum age in days
    pub lifetime: u64,
    pub(crate) employer: Option<FirmId>,
    pub wage: f64,
    pub sector: Sector,
    pub profile: SkillProfile,
    pub(crate) searching: bool,
    /// Consecutive days without fish
    pub days_without_food: u32,
}

impl Person {
    /// Create an unemployed, job-seeking worker
    pub fn new(id: PersonId, funds: f64, age: u64, lifetime: u64) -> Self {
        Person {
            id,
            funds,
            age,
            lifetime,
            employer: None,
            wage: 0.0,
            sector: Sector::Fishing,
            profile: SkillProfile::default(),
            searching: true,
            days_without_food: 0,
        }
    }

    /// Create a newborn worker
    pub fn newborn(id: PersonId, lifetime: u64) -> Self {
        Person::new(id, 0.0, 0, lifetime)
    }

    pub fn employer(&self) -> Option<FirmId> {
        self.employer
    }

    pub fn is_employed(&self) -> bool {
        self.employer.is_some()
    }

    /// Whether the worker submits a job application this cycle
    pub fn is_searching(&self) -> bool {
        self.searching && self.employer.is_none()
    }

    pub fn is_hungry(&self) -> bool {
        self.days_without_food > 0
    }

    /// Credit the daily wage if employed
    pub fn collect_wage(&mut self) {
        if self.employer.is_some() {
            self.funds += self.wage;
        }
    }

    /// Age one day; returns false once the lifetime is reached
    pub fn grow_older(&mut self) -> bool {
        self.age += 1;
        self.age < self.lifetime
    }

    /// Record whether the worker ate today
    pub fn record_meal(&mut self, purchased: f64) {
        if purchased < 1.0 {
            self.days_without_food += 1;
        } else {
            self.days_without_food = 0;
        }
    }
}
