//! Logic Module - Prediction Core
//!
//! - `lookup/` - airline and route statistics with explicit defaults
//! - `features/` - fixed feature layout and query → vector derivation
//! - `model/` - pipeline artifact, preprocessing, linear estimators
//! - `explain/` - Shapley attributions and recommendations
//! - `service` - the assembled per-request flow

pub mod config;
pub mod error;
pub mod query;
pub mod service;

pub mod explain;
pub mod features;
pub mod lookup;
pub mod model;

#[cfg(test)]
mod tests;
