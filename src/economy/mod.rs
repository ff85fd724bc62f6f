//! Fishing village economy
//!
//! Discrete-time agent-based model of a closed village: workers fish for
//! firms, firms sell the catch back to the workers, and two markets (labor
//! and fish) clear once per simulated day. Prices drift with the balance of
//! demand and supply; workers are born, age, and starve.

pub mod agent;
pub mod employment;
pub mod error;
pub mod firm;
pub mod goods_market;
pub mod harness;
pub mod labor_market;
pub mod params;
pub mod person;
pub mod population;
pub mod pricing;
pub mod registry;
pub mod report;
pub mod sampling;
pub mod setup;
pub mod types;
pub mod world;

pub use error::{ConfigError, ReportError};
pub use params::SimulationParams;
pub use report::{CycleSnapshot, RunSummary};
pub use types::{Cycle, FirmId, PersonId, Sector};
pub use world::{CycleOutcome, World};
