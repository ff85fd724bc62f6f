//! Core types for the village economy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Days in a simulated year, used to turn annual rates into daily ones
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Unique identifier for a worker
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Person#{}", self.0)
    }
}

/// Unique identifier for a firm
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FirmId(pub u64);

impl fmt::Display for FirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Firm#{}", self.0)
    }
}

/// Simulation time unit (1 cycle = 1 day)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cycle(pub u64);

impl Cycle {
    /// Fractional year for a given cycles-per-year scale
    pub fn year(&self, cycle_scale: f64) -> f64 {
        if cycle_scale > 0.0 {
            self.0 as f64 / cycle_scale
        } else {
            0.0
        }
    }

    pub fn next(&self) -> Cycle {
        Cycle(self.0 + 1)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {}", self.0)
    }
}

/// Economic sector of a job or a good.
///
/// The village only fishes, but postings, applications, offers and orders
/// all carry a sector and markets only match equal sectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[default]
    Fishing,
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sector::Fishing => write!(f, "fishing"),
        }
    }
}

/// Skill and preference levels of a worker (each 1-5).
///
/// Carried on applications but not used by the first-fit matching rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillProfile {
    pub education: u8,
    pub experience: u8,
    /// Minimum job attractiveness the worker accepts
    pub min_attractiveness: u8,
}

impl SkillProfile {
    pub fn new(education: u8, experience: u8, min_attractiveness: u8) -> Self {
        SkillProfile {
            education: education.clamp(1, 5),
            experience: experience.clamp(1, 5),
            min_attractiveness: min_attractiveness.clamp(1, 5),
        }
    }
}

impl Default for SkillProfile {
    fn default() -> Self {
        SkillProfile::new(1, 1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_year() {
        assert_eq!(Cycle(730).year(365.0), 2.0);
        assert_eq!(Cycle(10).year(0.0), 0.0);
        assert_eq!(Cycle(4).next(), Cycle(5));
    }

    #[test]
    fn test_skill_profile_clamped() {
        let profile = SkillProfile::new(0, 9, 3);
        assert_eq!(profile.education, 1);
        assert_eq!(profile.experience, 5);
        assert_eq!(profile.min_attractiveness, 3);
    }
}
