//! airprox Engine - Notification gating and fix ingestion
//!
//! This crate drives matching and one-shot notification for every incoming
//! fix, in both the long-lived foreground process and one-fix headless
//! invocations that reload their state from durable storage.

pub mod dataset;
pub mod gate;
pub mod ingestor;
pub mod notification;

pub use dataset::refresh_points;
pub use gate::NotificationGate;
pub use ingestor::{FixIngestor, FixOutcome, IngestSummary, Sinks};
