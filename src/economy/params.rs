//! Configuration parameters for the village economy
//!
//! Parameters come from a keyword file (`keyword value` per line, the
//! legacy camelCase keywords are accepted) or from a JSON document.
//! Both forms go through the same serde definition and are validated
//! before a world is built.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::economy::error::ConfigError;

/// Main configuration for the simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationParams {
    // Run settings
    /// Total simulated days
    #[serde(alias = "totalCycles")]
    pub total_cycles: u64,
    /// Days per reported year
    #[serde(alias = "cycleScale")]
    pub cycle_scale: f64,

    // Population
    /// Initial number of workers
    #[serde(alias = "totalFisherMen", alias = "totalPopulation")]
    pub total_population: u64,
    /// Births per worker per year (0.02 = 2%)
    #[serde(alias = "annualBirthRate")]
    pub annual_birth_rate: f64,
    /// Consecutive days without fish before a worker dies
    #[serde(alias = "maxStarvingDays")]
    pub max_starving_days: u32,
    /// Mean initial age in years
    #[serde(alias = "ageDistMean", default = "default_age_mean")]
    pub age_dist_mean: f64,
    /// Variance of the initial age in years squared
    #[serde(alias = "ageDistVariance", default = "default_age_variance")]
    pub age_dist_variance: f64,
    /// Mean lifetime in years
    #[serde(alias = "lifetimeDistMean", default = "default_lifetime_mean")]
    pub lifetime_dist_mean: f64,
    /// Variance of the lifetime in years squared
    #[serde(alias = "lifetimeDistVariance", default = "default_lifetime_variance")]
    pub lifetime_dist_variance: f64,
    /// Lifetime of a newborn worker in days
    #[serde(default = "default_newborn_lifetime")]
    pub newborn_lifetime_days: u64,

    // Firms and employment
    /// Firm count when >= 1, otherwise a fraction of the population
    #[serde(alias = "totalFirms")]
    pub total_firms: f64,
    /// Fraction of the population employed at start
    #[serde(alias = "initialEmployed")]
    pub initial_employed: f64,
    /// Fraction of the population posted as vacancies on the first day
    #[serde(alias = "totalJobOffers")]
    pub initial_job_offers: f64,
    /// Daily wage of initially employed workers
    #[serde(alias = "initialWage")]
    pub initial_wage: f64,
    /// Fish caught per employee per day
    #[serde(alias = "employeeEfficiency")]
    pub employee_efficiency: f64,
    /// Mean starting funds of a firm
    #[serde(default = "default_firm_funds_mean")]
    pub firm_funds_mean: f64,
    /// Standard deviation of starting firm funds
    #[serde(default = "default_firm_funds_std")]
    pub firm_funds_std: f64,
    /// Multiplier applied to the clearing wage for new hires
    #[serde(default = "default_hire_wage_multiplier")]
    pub hire_wage_multiplier: f64,
    /// Fish consumed per worker per day, used to derive the clearing wage
    #[serde(alias = "meanFishOrder", default = "default_mean_fish_order")]
    pub mean_fish_order: f64,
    /// Accepted for parameter-file compatibility; the quartile policy ignores it
    #[serde(alias = "postingRate")]
    pub posting_rate: f64,
    /// Accepted for parameter-file compatibility; the quartile policy ignores it
    #[serde(alias = "firingRate")]
    pub firing_rate: f64,

    // Prices
    /// Mean price firms offer at start
    #[serde(alias = "offeredPriceMean")]
    pub offered_price_mean: f64,
    /// Mean price consumers perceive as fair at start
    #[serde(alias = "perceivedPriceMean")]
    pub perceived_price_mean: f64,
    /// Spread of firm prices around the offered mean
    #[serde(default = "default_firm_price_std")]
    pub firm_price_std: f64,
    /// Spread of perceived values around the perceived mean
    #[serde(default = "default_consumer_price_std")]
    pub consumer_price_std: f64,

    // Inflation adjustment
    /// Mean factor when demand exceeds supply (e.g. 1.025)
    #[serde(alias = "meanAugmentationInflat")]
    pub mean_augmentation: f64,
    /// Variance of the augmentation factor
    #[serde(alias = "varianceAugmentationInflat")]
    pub variance_augmentation: f64,
    /// Mean factor when supply exceeds demand (e.g. 0.975)
    #[serde(alias = "meanDiminutionInflat")]
    pub mean_diminution: f64,
    /// Variance of the diminution factor
    #[serde(alias = "varianceDiminutionInflat")]
    pub variance_diminution: f64,
}

fn default_age_mean() -> f64 {
    30.0
}

fn default_age_variance() -> f64 {
    400.0
}

fn default_lifetime_mean() -> f64 {
    60.0
}

fn default_lifetime_variance() -> f64 {
    25.0
}

fn default_newborn_lifetime() -> u64 {
    365 * 60
}

fn default_firm_funds_mean() -> f64 {
    100.0
}

fn default_firm_funds_std() -> f64 {
    20.0
}

fn default_hire_wage_multiplier() -> f64 {
    1.5
}

fn default_mean_fish_order() -> f64 {
    1.0
}

fn default_firm_price_std() -> f64 {
    0.5
}

fn default_consumer_price_std() -> f64 {
    0.8
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            total_cycles: 3650,
            cycle_scale: 365.0,

            total_population: 1000,
            annual_birth_rate: 0.02,
            max_starving_days: 7,
            age_dist_mean: default_age_mean(),
            age_dist_variance: default_age_variance(),
            lifetime_dist_mean: default_lifetime_mean(),
            lifetime_dist_variance: default_lifetime_variance(),
            newborn_lifetime_days: default_newborn_lifetime(),

            total_firms: 0.08,
            initial_employed: 0.9,
            initial_job_offers: 0.1,
            initial_wage: 5.0,
            employee_efficiency: 2.0,
            firm_funds_mean: default_firm_funds_mean(),
            firm_funds_std: default_firm_funds_std(),
            hire_wage_multiplier: default_hire_wage_multiplier(),
            mean_fish_order: default_mean_fish_order(),
            posting_rate: 0.1,
            firing_rate: 0.05,

            offered_price_mean: 5.1,
            perceived_price_mean: 5.0,
            firm_price_std: default_firm_price_std(),
            consumer_price_std: default_consumer_price_std(),

            mean_augmentation: 1.025,
            variance_augmentation: 0.0001,
            mean_diminution: 0.975,
            variance_diminution: 0.0001,
        }
    }
}

impl SimulationParams {
    /// Small village for quick runs and tests
    pub fn small_village() -> Self {
        SimulationParams {
            total_cycles: 60,
            total_population: 100,
            total_firms: 5.0,
            ..Self::default()
        }
    }

    /// Load parameters from a file, choosing the format by extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_keyword_str(&text)
        }
    }

    /// Parse and validate a JSON parameter document
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let params: SimulationParams = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    /// Parse and validate a keyword parameter file
    pub fn from_keyword_str(text: &str) -> Result<Self, ConfigError> {
        let mut fields = Map::new();

        for (index, raw) in text.lines().enumerate() {
            let line = match raw.split('#').next() {
                Some(l) => l.trim(),
                None => continue,
            };
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let (keyword, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(k), Some(v), None) => (k, v),
                _ => {
                    return Err(ConfigError::MalformedLine {
                        line: index + 1,
                        content: raw.to_string(),
                    })
                }
            };

            let number = parse_number(value).ok_or_else(|| ConfigError::BadNumber {
                line: index + 1,
                keyword: keyword.to_string(),
                value: value.to_string(),
            })?;

            // First occurrence wins
            fields.entry(keyword.to_string()).or_insert(number);
        }

        let params: SimulationParams = serde_json::from_value(Value::Object(fields))?;
        params.validate()?;
        Ok(params)
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_population == 0 {
            return Err(ConfigError::invalid("total_population", "must be positive"));
        }
        if !(self.total_firms.is_finite() && self.total_firms > 0.0) {
            return Err(ConfigError::invalid("total_firms", "must be positive"));
        }
        if !(self.cycle_scale.is_finite() && self.cycle_scale > 0.0) {
            return Err(ConfigError::invalid("cycle_scale", "must be positive"));
        }
        if self.max_starving_days == 0 {
            return Err(ConfigError::invalid("max_starving_days", "must be at least 1"));
        }
        if self.newborn_lifetime_days == 0 {
            return Err(ConfigError::invalid("newborn_lifetime_days", "must be at least 1"));
        }

        let fractions = [
            ("initial_employed", self.initial_employed),
            ("initial_job_offers", self.initial_job_offers),
            ("posting_rate", self.posting_rate),
            ("firing_rate", self.firing_rate),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, format!("{} is outside [0, 1]", value)));
            }
        }

        let positive = [
            ("offered_price_mean", self.offered_price_mean),
            ("perceived_price_mean", self.perceived_price_mean),
            ("mean_augmentation", self.mean_augmentation),
            ("mean_diminution", self.mean_diminution),
            ("hire_wage_multiplier", self.hire_wage_multiplier),
            ("lifetime_dist_mean", self.lifetime_dist_mean),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("{} must be positive", value)));
            }
        }

        let non_negative = [
            ("annual_birth_rate", self.annual_birth_rate),
            ("initial_wage", self.initial_wage),
            ("employee_efficiency", self.employee_efficiency),
            ("mean_fish_order", self.mean_fish_order),
            ("age_dist_mean", self.age_dist_mean),
            ("age_dist_variance", self.age_dist_variance),
            ("lifetime_dist_variance", self.lifetime_dist_variance),
            ("firm_funds_std", self.firm_funds_std),
            ("firm_price_std", self.firm_price_std),
            ("consumer_price_std", self.consumer_price_std),
            ("variance_augmentation", self.variance_augmentation),
            ("variance_diminution", self.variance_diminution),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, format!("{} must not be negative", value)));
            }
        }

        if !self.firm_funds_mean.is_finite() {
            return Err(ConfigError::invalid("firm_funds_mean", "must be finite"));
        }

        Ok(())
    }

    /// Number of firms to create
    pub fn firm_count(&self) -> usize {
        if self.total_firms >= 1.0 {
            self.total_firms.floor() as usize
        } else {
            ((self.total_firms * self.total_population as f64).floor() as usize).max(1)
        }
    }

    /// Number of workers employed at start
    pub fn employed_count(&self) -> usize {
        (self.initial_employed * self.total_population as f64).floor() as usize
    }

    /// Vacancies posted during the first day
    pub fn initial_job_offer_count(&self) -> usize {
        (self.initial_job_offers * self.total_population as f64).floor() as usize
    }
}

/// Parse an integer or float keyword value into a JSON number
fn parse_number(value: &str) -> Option<Value> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(Value::from(n));
    }
    if let Ok(n) = value.parse::<i64>() {
        return Some(Value::from(n));
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Value::from)
}
