//! Scenario and property tests for the board.
//!
//! - `scenarios.rs`: end-to-end board operations on small fixed grids
//! - `properties.rs`: proptest properties over positions and entity mixes
//! - `helpers.rs`: board construction and entity placement utilities

mod helpers;
mod scenarios;

pub use helpers::*;
