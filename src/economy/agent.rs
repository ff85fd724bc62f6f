//! Daily step shared by workers and firms

use crate::economy::firm::Firm;
use crate::economy::person::Person;

/// Either kind of agent, borrowed for one step
pub enum Agent<'a> {
    Person(&'a mut Person),
    Firm(&'a mut Firm),
}

/// What happened to an agent during its step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Alive,
    /// Reached the end of its lifetime and must be removed
    Expired,
}

impl Agent<'_> {
    /// Advance the agent by one day.
    ///
    /// A worker collects its wage and ages; a firm adds the day's catch to
    /// its stock.
    pub fn step(&mut self) -> StepOutcome {
        match self {
            Agent::Person(person) => {
                person.collect_wage();
                if person.grow_older() {
                    StepOutcome::Alive
                } else {
                    StepOutcome::Expired
                }
            }
            Agent::Firm(firm) => {
                firm.restock();
                StepOutcome::Alive
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::types::{FirmId, PersonId};

    #[test]
    fn test_person_step_expires_at_lifetime() {
        let mut person = Person::new(PersonId(0), 0.0, 1, 3);
        assert_eq!(Agent::Person(&mut person).step(), StepOutcome::Alive);
        assert_eq!(Agent::Person(&mut person).step(), StepOutcome::Expired);
    }

    #[test]
    fn test_firm_step_restocks() {
        let mut firm = Firm::new(FirmId(0), 0.0, 4.0, 5.0, 2.0);
        assert_eq!(Agent::Firm(&mut firm).step(), StepOutcome::Alive);
        // No employees, no catch
        assert_eq!(firm.stock, 4.0);
    }
}
