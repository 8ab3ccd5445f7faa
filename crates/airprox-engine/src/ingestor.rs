//! Fix ingestion control loop.
//!
//! Every fix runs to completion (match, gate, emit) before the next one is
//! accepted. The suppression check and its commit happen inside one store
//! transaction, and the commit lands before any sink is called: a storage
//! failure therefore aborts without emitting, and a sink failure after a
//! successful commit still counts as fired.

use airprox_core::error::{ProximityError, Result};
use airprox_core::models::{Fix, GatePolicy, Match, PointOfInterestSet, SUPPRESSION_KEY};
use airprox_core::ports::{AnalyticsSink, ErrorReporter, NotificationSink};
use airprox_geo::ProximityMatcher;
use airprox_store::{PointSetStore, SuppressionStore};
use futures::{Stream, StreamExt};
use std::sync::Arc;

use crate::gate::NotificationGate;
use crate::notification::{build_event, build_notification};

/// External collaborators that receive the engine's output
#[derive(Clone)]
pub struct Sinks {
    pub notifications: Arc<dyn NotificationSink>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub errors: Arc<dyn ErrorReporter>,
}

/// What happened to a single fix
#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// No dataset has been loaded yet, so nothing was matched
    NoPointSet,
    NoMatch,
    Suppressed { point: String, distance_meters: f64 },
    Fired { point: String, distance_meters: f64, sink_failures: usize },
}

/// Counters for a foreground run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub processed: usize,
    pub fired: usize,
    pub suppressed: usize,
    pub no_match: usize,
    pub failed: usize,
}

impl IngestSummary {
    fn record(&mut self, outcome: &FixOutcome) {
        self.processed += 1;
        match outcome {
            FixOutcome::Fired { .. } => self.fired += 1,
            FixOutcome::Suppressed { .. } => self.suppressed += 1,
            FixOutcome::NoMatch | FixOutcome::NoPointSet => self.no_match += 1,
        }
    }
}

/// Gate verdict, by index into the point set
#[derive(Debug, Clone, Copy)]
enum Decision {
    NoMatch,
    Suppressed { index: usize, distance_meters: f64 },
    Fire { index: usize, distance_meters: f64 },
}

pub struct FixIngestor {
    points: Option<Arc<PointOfInterestSet>>,
    points_store: Option<Arc<dyn PointSetStore>>,
    matcher: ProximityMatcher,
    gate: NotificationGate,
    suppression: Arc<dyn SuppressionStore>,
    sinks: Sinks,
}

impl FixIngestor {
    /// Foreground construction around an already-loaded point set
    pub fn new(
        points: Option<Arc<PointOfInterestSet>>,
        matcher: ProximityMatcher,
        policy: GatePolicy,
        suppression: Arc<dyn SuppressionStore>,
        sinks: Sinks,
    ) -> Self {
        Self {
            points,
            points_store: None,
            matcher,
            gate: NotificationGate::new(policy, matcher),
            suppression,
            sinks,
        }
    }

    /// Reload the point set from `store` while none is loaded, so matching
    /// starts once a later fetch persists one
    pub fn with_points_store(mut self, store: Arc<dyn PointSetStore>) -> Self {
        self.points_store = Some(store);
        self
    }

    /// Headless construction: reload the point set from durable storage.
    ///
    /// Any storage failure is returned so the invocation can abort without
    /// emitting.
    pub fn cold_start(
        points_store: &dyn PointSetStore,
        matcher: ProximityMatcher,
        policy: GatePolicy,
        suppression: Arc<dyn SuppressionStore>,
        sinks: Sinks,
    ) -> Result<Self> {
        let points = points_store.load_points()?.map(Arc::new);
        match &points {
            Some(set) => tracing::debug!("Cold start with {} persisted points", set.len()),
            None => tracing::info!("Cold start without a persisted dataset; fixes will be ignored"),
        }
        Ok(Self::new(points, matcher, policy, suppression, sinks))
    }

    /// Swap in a freshly fetched set
    pub fn replace_points(&mut self, set: Arc<PointOfInterestSet>) {
        tracing::info!("Matching against {} airports", set.len());
        self.points = Some(set);
    }

    /// Process one fix to completion.
    ///
    /// Errors are handed to the error reporter before being returned.
    pub async fn ingest(&self, fix: &Fix) -> Result<FixOutcome> {
        let outcome = self.process(fix).await;
        if let Err(error) = &outcome {
            self.report(error);
        }
        outcome
    }

    /// Foreground mode: consume fixes in arrival order until the stream ends.
    ///
    /// A failing fix is reported and the loop moves on to the next one.
    pub async fn run<S>(&mut self, fixes: S) -> IngestSummary
    where
        S: Stream<Item = Fix>,
    {
        futures::pin_mut!(fixes);
        let mut summary = IngestSummary::default();

        while let Some(fix) = fixes.next().await {
            if self.points.is_none() {
                if let Err(error) = self.reload_points() {
                    self.report(&error);
                }
            }

            match self.ingest(&fix).await {
                Ok(outcome) => summary.record(&outcome),
                Err(_) => {
                    summary.processed += 1;
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Pick up a set persisted since startup, if a points store is attached
    fn reload_points(&mut self) -> Result<()> {
        let Some(store) = &self.points_store else {
            return Ok(());
        };
        if let Some(set) = store.load_points()? {
            self.replace_points(Arc::new(set));
        }
        Ok(())
    }

    async fn process(&self, fix: &Fix) -> Result<FixOutcome> {
        let Some(points) = self.points.clone() else {
            tracing::debug!("Ignoring fix: no point set loaded");
            return Ok(FixOutcome::NoPointSet);
        };

        match self.decide(fix, &points).await? {
            Decision::NoMatch => {
                tracing::debug!(
                    "No airport within {} m of ({}, {})",
                    self.matcher.radius_meters(),
                    fix.coordinate.latitude,
                    fix.coordinate.longitude
                );
                Ok(FixOutcome::NoMatch)
            }
            Decision::Suppressed { index, distance_meters } => {
                let candidate = matched(&points, index, distance_meters)?;
                tracing::debug!(
                    "Suppressed repeat notification for {} ({:.2} m)",
                    candidate.point.display_name(),
                    distance_meters
                );
                Ok(FixOutcome::Suppressed { point: candidate.identity_key(), distance_meters })
            }
            Decision::Fire { index, distance_meters } => {
                let candidate = matched(&points, index, distance_meters)?;
                let sink_failures = self.emit(&candidate).await;
                tracing::info!(
                    "Proximity notification for {} at {:.2} m",
                    candidate.point.display_name(),
                    distance_meters
                );
                Ok(FixOutcome::Fired {
                    point: candidate.identity_key(),
                    distance_meters,
                    sink_failures,
                })
            }
        }
    }

    /// Check-then-commit against the suppression store in one transaction.
    ///
    /// Store transactions block on the cross-process lock and on file I/O,
    /// so they run on the blocking pool.
    async fn decide(&self, fix: &Fix, points: &Arc<PointOfInterestSet>) -> Result<Decision> {
        let candidate = self
            .matcher
            .find_match(fix, points)
            .map(|m| (m.index, m.distance_meters));
        if candidate.is_none() && !self.gate.rearms() {
            return Ok(Decision::NoMatch);
        }

        let fix = *fix;
        let gate = self.gate;
        let points = Arc::clone(points);
        let suppression = Arc::clone(&self.suppression);

        tokio::task::spawn_blocking(move || {
            decide_in_transaction(&fix, &points, candidate, gate, suppression.as_ref())
        })
        .await
        .map_err(|e| ProximityError::storage(SUPPRESSION_KEY, e))?
    }

    /// Fire-and-forget delivery to both sinks, returning the failure count
    async fn emit(&self, candidate: &Match<'_>) -> usize {
        let mut failures = 0;

        let notification = build_notification(candidate);
        if let Err(error) = self.sinks.notifications.notify(&notification).await {
            failures += 1;
            self.report(&error);
        }

        let event = build_event(candidate);
        if let Err(error) = self.sinks.analytics.log_event(&event).await {
            failures += 1;
            self.report(&error);
        }

        failures
    }

    /// Log `error` and forward it to the error reporter
    pub fn report(&self, error: &ProximityError) {
        if error.is_fatal() {
            tracing::error!("{}; fix dropped without emitting", error);
        } else {
            tracing::warn!("{}", error);
        }
        self.sinks.errors.report(error);
    }
}

fn decide_in_transaction(
    fix: &Fix,
    points: &PointOfInterestSet,
    candidate: Option<(usize, f64)>,
    gate: NotificationGate,
    suppression: &dyn SuppressionStore,
) -> Result<Decision> {
    let mut tx = suppression.begin()?;
    let rearmed = gate.observe(fix, tx.state_mut());
    for key in &rearmed {
        tracing::debug!("Re-armed {} after leaving its radius", key);
    }

    let decision = match candidate {
        Some((index, distance_meters)) => {
            let candidate = matched(points, index, distance_meters)?;
            if gate.should_fire(&candidate, tx.state()) {
                gate.record_fired(&candidate, tx.state_mut());
                Decision::Fire { index, distance_meters }
            } else {
                Decision::Suppressed { index, distance_meters }
            }
        }
        None => Decision::NoMatch,
    };

    if matches!(decision, Decision::Fire { .. }) || !rearmed.is_empty() {
        tx.commit()?;
    }

    Ok(decision)
}

fn matched(points: &PointOfInterestSet, index: usize, distance_meters: f64) -> Result<Match<'_>> {
    let point = points.get(index).ok_or_else(|| {
        ProximityError::storage(SUPPRESSION_KEY, format!("matched point #{} vanished", index))
    })?;
    Ok(Match { point, index, distance_meters })
}
