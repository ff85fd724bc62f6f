//! Price adaptation and inflation
//!
//! After the goods market clears, the mean offered price (firms) and the
//! mean perceived price (consumers) move together by a random factor whose
//! direction follows the demand/supply ratio. Inflation is read off the
//! goods market's clearing-price history.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::economy::params::SimulationParams;
use crate::economy::sampling;

/// Supply at or below this counts as no supply
pub const SUPPLY_EPSILON: f64 = 1e-9;

/// Lowest factor a single adaptation may apply, so means stay positive
const MIN_FACTOR: f64 = 0.01;

/// Running price means fed into next day's price draws
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceSignals {
    pub offered_mean: f64,
    pub perceived_mean: f64,
}

impl PriceSignals {
    pub fn new(offered_mean: f64, perceived_mean: f64) -> Self {
        PriceSignals {
            offered_mean,
            perceived_mean,
        }
    }

    pub fn from_params(params: &SimulationParams) -> Self {
        PriceSignals::new(params.offered_price_mean, params.perceived_price_mean)
    }

    /// Scale both means by a factor drawn from the demand/supply ratio.
    /// Returns the applied factor.
    pub fn adapt<R: Rng>(
        &mut self,
        aggregate_demand: f64,
        aggregate_supply: f64,
        params: &SimulationParams,
        rng: &mut R,
    ) -> f64 {
        let ratio = demand_supply_ratio(aggregate_demand, aggregate_supply);
        let factor = adaptation_factor(ratio, params, rng);
        self.offered_mean *= factor;
        self.perceived_mean *= factor;
        factor
    }
}

/// Demand over supply; no supply means no pressure either way
pub fn demand_supply_ratio(aggregate_demand: f64, aggregate_supply: f64) -> f64 {
    if aggregate_supply <= SUPPLY_EPSILON {
        1.0
    } else {
        aggregate_demand / aggregate_supply
    }
}

/// Draw the multiplicative price factor for a demand/supply ratio
pub fn adaptation_factor<R: Rng>(ratio: f64, params: &SimulationParams, rng: &mut R) -> f64 {
    let factor = if ratio > 1.0 {
        sampling::normal_from_variance(rng, params.mean_augmentation, params.variance_augmentation)
    } else if ratio < 1.0 {
        sampling::normal_from_variance(rng, params.mean_diminution, params.variance_diminution)
    } else {
        return 1.0;
    };
    factor.max(MIN_FACTOR)
}

/// Relative change between the last two clearing prices
pub fn inflation(price_history: &[f64]) -> f64 {
    match price_history {
        [.., previous, latest] if *previous > 0.0 => (latest - previous) / previous,
        _ => 0.0,
    }
}
