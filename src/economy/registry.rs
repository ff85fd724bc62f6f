//! Id-keyed arenas for workers and firms
//!
//! Workers and firms refer to each other only by id. The employer field on
//! [`Person`] and the employee set on [`Firm`] form a bijection that is
//! written exclusively by [`Registry::hire`] and [`Registry::fire`]; the
//! labor market calls the former and the employment controller the latter.
//! Ordered maps keep iteration in creation order so runs are reproducible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::economy::firm::Firm;
use crate::economy::person::Person;
use crate::economy::types::{FirmId, PersonId};

/// Arena of all living workers and active firms
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Registry {
    persons: BTreeMap<PersonId, Person>,
    firms: BTreeMap<FirmId, Firm>,
    /// Firms removed from the simulation, kept for revenue reporting
    retired_firms: Vec<Firm>,
    next_person_id: u64,
    next_firm_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Reserve the next worker id
    pub fn next_person_id(&mut self) -> PersonId {
        let id = PersonId(self.next_person_id);
        self.next_person_id += 1;
        id
    }

    /// Reserve the next firm id
    pub fn next_firm_id(&mut self) -> FirmId {
        let id = FirmId(self.next_firm_id);
        self.next_firm_id += 1;
        id
    }

    /// Add an unemployed worker. Any employer already set on it is dropped.
    pub fn insert_person(&mut self, mut person: Person) -> PersonId {
        let id = person.id;
        person.employer = None;
        self.next_person_id = self.next_person_id.max(id.0 + 1);
        self.persons.insert(id, person);
        id
    }

    /// Add a firm without employees
    pub fn insert_firm(&mut self, mut firm: Firm) -> FirmId {
        let id = firm.id;
        firm.employees.clear();
        self.next_firm_id = self.next_firm_id.max(id.0 + 1);
        self.firms.insert(id, firm);
        id
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    pub fn person_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        self.persons.get_mut(&id)
    }

    pub fn firm(&self, id: FirmId) -> Option<&Firm> {
        self.firms.get(&id)
    }

    pub fn firm_mut(&mut self, id: FirmId) -> Option<&mut Firm> {
        self.firms.get_mut(&id)
    }

    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    pub fn persons_mut(&mut self) -> impl Iterator<Item = &mut Person> {
        self.persons.values_mut()
    }

    pub fn firms(&self) -> impl Iterator<Item = &Firm> {
        self.firms.values()
    }

    pub fn firms_mut(&mut self) -> impl Iterator<Item = &mut Firm> {
        self.firms.values_mut()
    }

    pub fn retired_firms(&self) -> &[Firm] {
        &self.retired_firms
    }

    pub fn population(&self) -> usize {
        self.persons.len()
    }

    pub fn firm_count(&self) -> usize {
        self.firms.len()
    }

    pub fn unemployed_count(&self) -> usize {
        self.persons.values().filter(|p| !p.is_employed()).count()
    }

    /// Link a worker to a firm at the given wage.
    ///
    /// Fails (returns false) when either side is missing or the worker is
    /// already employed.
    pub(crate) fn hire(&mut self, person_id: PersonId, firm_id: FirmId, wage: f64) -> bool {
        let firm = match self.firms.get_mut(&firm_id) {
            Some(f) => f,
            None => return false,
        };
        let person = match self.persons.get_mut(&person_id) {
            Some(p) if p.employer.is_none() => p,
            _ => return false,
        };

        person.employer = Some(firm_id);
        person.wage = wage;
        person.searching = false;
        firm.employees.insert(person_id);
        true
    }

    /// Break a worker's link to its employer and put it back on the job
    /// market. Returns the former employer.
    pub(crate) fn fire(&mut self, person_id: PersonId) -> Option<FirmId> {
        let person = self.persons.get_mut(&person_id)?;
        let firm_id = person.employer.take()?;
        person.searching = true;
        person.wage = 0.0;

        if let Some(firm) = self.firms.get_mut(&firm_id) {
            firm.employees.remove(&person_id);
        }
        Some(firm_id)
    }

    /// Remove a worker from the simulation, unlinking it from its employer
    pub fn remove_person(&mut self, person_id: PersonId) -> Option<Person> {
        let person = self.persons.remove(&person_id)?;
        if let Some(firm_id) = person.employer {
            if let Some(firm) = self.firms.get_mut(&firm_id) {
                firm.employees.remove(&person_id);
            }
        }
        Some(person)
    }

    /// Remove every worker matching the predicate, returning how many left
    pub fn remove_persons_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Person) -> bool,
    {
        let doomed: Vec<PersonId> = self
            .persons
            .values()
            .filter(|p| predicate(p))
            .map(|p| p.id)
            .collect();

        for &id in &doomed {
            self.remove_person(id);
        }
        doomed.len()
    }

    /// Retire every firm without employees. Returns the retired ids.
    pub fn retire_empty_firms(&mut self) -> Vec<FirmId> {
        let empty: Vec<FirmId> = self
            .firms
            .values()
            .filter(|f| f.employees.is_empty())
            .map(|f| f.id)
            .collect();

        for id in &empty {
            if let Some(firm) = self.firms.remove(id) {
                self.retired_firms.push(firm);
            }
        }
        empty
    }

    /// Check the employer/employee bijection
    pub fn links_consistent(&self) -> bool {
        let forward = self.firms.values().all(|firm| {
            firm.employees.iter().all(|pid| {
                self.persons
                    .get(pid)
                    .map(|p| p.employer == Some(firm.id))
                    .unwrap_or(false)
            })
        });

        let backward = self.persons.values().all(|person| match person.employer {
            Some(fid) => self
                .firms
                .get(&fid)
                .map(|f| f.employees.contains(&person.id))
                .unwrap_or(false),
            None => true,
        });

        forward && backward
    }
}
