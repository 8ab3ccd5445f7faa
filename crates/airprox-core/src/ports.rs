//! Port trait definitions
//!
//! These traits define the external collaborators the engine talks to.

pub mod dataset;
pub mod sinks;

pub use dataset::DatasetSource;
pub use sinks::{
    AnalyticsEvent, AnalyticsSink, ErrorReporter, Notification, NotificationSink, PROXIMITY_EVENT,
};
