use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProximityError, Result};

/// Analytics event name emitted for every fired proximity notification
pub const PROXIMITY_EVENT: &str = "notification_sent_proximity";

/// A user-visible notification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,

    /// Opaque to the engine; handed back by the platform on tap
    pub payload: String,
}

/// An analytics event with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub airport_name: String,
    pub distance_meters: f64,
}

/// Port for the platform notification service
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Port for remote analytics
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn log_event(&self, event: &AnalyticsEvent) -> Result<()>;
}

/// Port for remote error reporting
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &ProximityError);
}
