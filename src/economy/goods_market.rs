//! Goods (fish) market
//!
//! Firms offer their whole stock at their price level, every living worker
//! asks for exactly one fish. Orders and offers are shuffled, then each
//! order picks uniformly among the offers it accepts. A hungry buyer
//! accepts any price it can pay; a fed buyer only pays up to its perceived
//! value.

use std::collections::BTreeMap;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::economy::agent::Agent;
use crate::economy::params::SimulationParams;
use crate::economy::pricing::PriceSignals;
use crate::economy::registry::Registry;
use crate::economy::sampling;
use crate::economy::types::{FirmId, PersonId, Sector};

/// Lowest unit price a firm may ask
pub const MIN_PRICE: f64 = 0.01;

/// A firm's stock put up for sale
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FishOffer {
    pub firm: FirmId,
    pub sector: Sector,
    pub price: f64,
    pub quantity: f64,
}

/// One worker's daily request for fish
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FishOrder {
    pub worker: PersonId,
    pub sector: Sector,
    /// Always one unit
    pub quantity: f64,
    pub perceived_value: f64,
    pub hungry: bool,
    pub available_funds: f64,
}

impl FishOrder {
    pub fn new(worker: PersonId, perceived_value: f64, hungry: bool, available_funds: f64) -> Self {
        FishOrder {
            worker,
            sector: Sector::Fishing,
            quantity: 1.0,
            perceived_value,
            hungry,
            available_funds,
        }
    }

    /// Hunger-priority acceptance test
    pub fn accepts(&self, price: f64) -> bool {
        if self.hungry {
            self.available_funds >= price
        } else {
            self.perceived_value >= price
        }
    }
}

/// Result of one clearing round
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodsClearing {
    pub matched_volume: f64,
    pub clearing_price: f64,
}

/// Market state; aggregates survive until the next supply refresh so the
/// price controller can read them after clearing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoodsMarket {
    offers: Vec<FishOffer>,
    orders: Vec<FishOrder>,
    aggregate_supply: f64,
    aggregate_demand: f64,
    clearing_price: f64,
    matched_volume: f64,
    /// Units bought per worker during the current cycle
    purchases: BTreeMap<PersonId, f64>,
    /// Clearing price after every cycle, starting with the initial price
    price_history: Vec<f64>,
}

impl GoodsMarket {
    pub fn new(initial_price: f64) -> Self {
        GoodsMarket {
            offers: Vec::new(),
            orders: Vec::new(),
            aggregate_supply: 0.0,
            aggregate_demand: 0.0,
            clearing_price: initial_price,
            matched_volume: 0.0,
            purchases: BTreeMap::new(),
            price_history: vec![initial_price],
        }
    }

    pub fn clearing_price(&self) -> f64 {
        self.clearing_price
    }

    pub fn aggregate_supply(&self) -> f64 {
        self.aggregate_supply
    }

    pub fn aggregate_demand(&self) -> f64 {
        self.aggregate_demand
    }

    pub fn matched_volume(&self) -> f64 {
        self.matched_volume
    }

    pub fn price_history(&self) -> &[f64] {
        &self.price_history
    }

    pub fn purchases(&self) -> &BTreeMap<PersonId, f64> {
        &self.purchases
    }

    /// Units a worker bought this cycle
    pub fn purchased(&self, worker: PersonId) -> f64 {
        self.purchases.get(&worker).copied().unwrap_or(0.0)
    }

    pub fn submit_offer(&mut self, offer: FishOffer) {
        self.aggregate_supply += offer.quantity;
        self.offers.push(offer);
    }

    pub fn submit_order(&mut self, order: FishOrder) {
        self.aggregate_demand += order.quantity;
        self.orders.push(order);
    }

    /// Restock every firm, redraw its price around the offered mean and
    /// put its stock on the market
    pub fn refresh_supply<R: Rng>(
        &mut self,
        registry: &mut Registry,
        signals: &PriceSignals,
        params: &SimulationParams,
        rng: &mut R,
    ) {
        self.offers.clear();
        self.aggregate_supply = 0.0;
        self.aggregate_demand = 0.0;
        self.matched_volume = 0.0;

        if registry.firm_count() == 0 {
            warn!("no active firms, skipping supply refresh");
            return;
        }

        let mut offers = Vec::with_capacity(registry.firm_count());
        for firm in registry.firms_mut() {
            Agent::Firm(&mut *firm).step();
            firm.price_level = sampling::normal(rng, signals.offered_mean, params.firm_price_std)
                .max(MIN_PRICE);

            offers.push(FishOffer {
                firm: firm.id,
                sector: firm.sector,
                price: firm.price_level,
                quantity: firm.stock,
            });
        }

        for offer in offers {
            self.submit_offer(offer);
        }
    }

    /// Every living worker asks for one fish
    pub fn collect_demand<R: Rng>(
        &mut self,
        registry: &Registry,
        signals: &PriceSignals,
        params: &SimulationParams,
        rng: &mut R,
    ) {
        self.orders.clear();
        self.aggregate_demand = 0.0;

        for person in registry.persons() {
            let perceived = sampling::normal(rng, signals.perceived_mean, params.consumer_price_std);
            self.submit_order(FishOrder::new(
                person.id,
                perceived,
                person.is_hungry(),
                person.funds,
            ));
        }
    }

    /// Match orders against offers, credit the sellers and update the
    /// clearing price. Orders and offers are discarded afterwards.
    pub fn clear<R: Rng>(&mut self, registry: &mut Registry, rng: &mut R) -> GoodsClearing {
        self.purchases.clear();
        self.matched_volume = 0.0;

        self.orders.shuffle(rng);
        self.offers.shuffle(rng);

        let mut transaction_value = 0.0;
        let mut volume = 0.0;
        let mut candidates: Vec<usize> = Vec::with_capacity(self.offers.len());

        for order in &self.orders {
            candidates.clear();
            candidates.extend(self.offers.iter().enumerate().filter_map(|(i, offer)| {
                let eligible = offer.sector == order.sector
                    && offer.quantity >= order.quantity
                    && order.accepts(offer.price);
                eligible.then_some(i)
            }));

            let chosen = match candidates.choose(rng) {
                Some(&i) => i,
                None => continue,
            };

            let offer = &mut self.offers[chosen];
            let quantity = order.quantity;
            offer.quantity -= quantity;
            volume += quantity;
            transaction_value += offer.price * quantity;
            *self.purchases.entry(order.worker).or_insert(0.0) += quantity;

            if let Some(firm) = registry.firm_mut(offer.firm) {
                firm.add_sale(offer.price, quantity);
            }
        }

        if volume > 0.0 {
            self.clearing_price = transaction_value / volume;
        }
        self.price_history.push(self.clearing_price);
        self.matched_volume = volume;

        debug!(
            "goods market: supply {:.1}, demand {:.1}, matched {:.1}, price {:.3}",
            self.aggregate_supply, self.aggregate_demand, volume, self.clearing_price
        );

        self.orders.clear();
        self.offers.clear();

        GoodsClearing {
            matched_volume: volume,
            clearing_price: self.clearing_price,
        }
    }
}
