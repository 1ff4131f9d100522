//! Monte Carlo profit sweeps for a small service business.
//!
//! A sweep expands parameter lists into combinations, simulates each
//! combination month by month on its own deterministic stream, and
//! groups the resulting series by "every parameter fixed except one".

pub mod client_model;
pub mod combination;
pub mod company_model;
pub mod config;
pub mod distributions;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod order_model;
pub mod rng;
pub mod simulation;
pub mod stats;
pub mod store;
pub mod sweep;
pub mod types;

pub use combination::{ParamField, ParameterCombination};
pub use error::{SimError, SimResult};
pub use grouping::group_by;
pub use simulation::simulate;
pub use sweep::run_sweep;
