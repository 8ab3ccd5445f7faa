//! Concrete collaborators for the engine's output ports

use airprox_core::error::{ProximityError, Result};
use airprox_core::ports::{AnalyticsEvent, AnalyticsSink, ErrorReporter, Notification, NotificationSink};
use airprox_core::SinkKind;
use airprox_engine::Sinks;
use async_trait::async_trait;
use console::style;
use std::io::Write;
use std::sync::Arc;

/// Shows notifications on the terminal (stderr as JSON lines with `--json`)
pub struct ConsoleNotificationSink {
    json: bool,
}

#[async_trait]
impl NotificationSink for ConsoleNotificationSink {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        // In JSON mode stdout carries only the command result document
        let written = if self.json {
            let line = serde_json::json!({ "status": "notification", "data": notification });
            writeln!(std::io::stderr(), "{}", line)
        } else {
            writeln!(
                std::io::stdout(),
                "{} {}\n  {}",
                style("✈").cyan().bold(),
                style(&notification.title).bold(),
                notification.body
            )
        };
        written.map_err(|e| ProximityError::sink(SinkKind::Notification, e))
    }
}

/// Records analytics events as structured log lines
pub struct TracingAnalyticsSink;

#[async_trait]
impl AnalyticsSink for TracingAnalyticsSink {
    async fn log_event(&self, event: &AnalyticsEvent) -> Result<()> {
        tracing::info!(
            event = %event.name,
            airport_name = %event.airport_name,
            distance_meters = event.distance_meters,
            "analytics event"
        );
        Ok(())
    }
}

/// Forwards engine errors to the log
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, error: &ProximityError) {
        let kind = match error {
            ProximityError::DatasetUnreachable { .. } => "dataset_unreachable",
            ProximityError::DatasetMalformed { .. } => "dataset_malformed",
            ProximityError::SinkFailure { .. } => "sink_failure",
            ProximityError::StorageFailure { .. } => "storage_failure",
        };
        tracing::error!(kind, "{}", error);
    }
}

/// Sinks used by every command that ingests fixes
pub fn console_sinks(json: bool) -> Sinks {
    Sinks {
        notifications: Arc::new(ConsoleNotificationSink { json }),
        analytics: Arc::new(TracingAnalyticsSink),
        errors: Arc::new(TracingErrorReporter),
    }
}
