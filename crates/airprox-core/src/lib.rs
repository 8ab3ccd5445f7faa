//! airprox Core - Domain models, error taxonomy, and configuration
//!
//! This crate contains the airport proximity domain model and the port
//! definitions for the collaborators around the engine.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{ConfigError, ProximityError, Result, SinkKind};
