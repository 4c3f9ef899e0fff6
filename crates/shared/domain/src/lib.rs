//! # Domain Types
//!
//! Plain data shared by the formwork crates: coercion kinds, property flags,
//! reserved accessor names, declarative form definitions and CLI configuration.
//! Keep it lean: no I/O and no behaviour beyond small helpers.

pub mod coercion;
pub mod config;
pub mod constants;
pub mod definition;
pub mod flags;

pub use serde_json::{Map, Value};
