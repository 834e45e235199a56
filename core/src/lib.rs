//! Deterministic synthetic grid-asset fleet generator.
//!
//! Every record is a pure function of an asset tag (plus, for the fleet
//! as a whole, the fleet seed). See `fleet` for the entry points.

pub mod asset_synthesizer;
pub mod catalog;
pub mod config;
pub mod diagnostic_synthesizer;
pub mod error;
pub mod failure_mode;
pub mod fleet;
pub mod geo;
pub mod health_record_synthesizer;
pub mod name_generator;
pub mod rng;
pub mod sampler;
pub mod scenario_synthesizer;
pub mod types;
pub mod work_order_synthesizer;
