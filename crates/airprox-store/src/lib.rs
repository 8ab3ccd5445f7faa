//! airprox Store - Persistence ports and adapters
//!
//! This crate defines the durable key-value ports the engine needs across
//! process restarts and provides in-memory and file-backed adapters.

pub mod file;
pub mod memory;
pub mod ports;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use ports::{PointSetStore, SuppressionStore, SuppressionTransaction};
