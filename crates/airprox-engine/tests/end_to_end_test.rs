//! End-to-end tests for the proximity engine
//!
//! Foreground runs keep one ingestor alive across fixes; headless runs build
//! a fresh ingestor from the state directory for every fix, the way a
//! reawakened process would.

use airprox_core::error::{ProximityError, Result};
use airprox_core::models::{Fix, GatePolicy, RawRecord};
use airprox_core::ports::{
    AnalyticsEvent, AnalyticsSink, DatasetSource, ErrorReporter, Notification, NotificationSink,
};
use airprox_engine::{refresh_points, FixIngestor, FixOutcome, Sinks};
use airprox_geo::ProximityMatcher;
use airprox_store::{FileStateStore, MemoryStateStore, PointSetStore, SuppressionStore};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingSinks {
    notifications: Mutex<Vec<Notification>>,
    events: Mutex<Vec<AnalyticsEvent>>,
}

#[async_trait]
impl NotificationSink for RecordingSinks {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[async_trait]
impl AnalyticsSink for RecordingSinks {
    async fn log_event(&self, event: &AnalyticsEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

impl ErrorReporter for RecordingSinks {
    fn report(&self, _error: &ProximityError) {}
}

impl RecordingSinks {
    fn sinks(self: &Arc<Self>) -> Sinks {
        Sinks { notifications: self.clone(), analytics: self.clone(), errors: self.clone() }
    }

    fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

struct JfkDataset;

#[async_trait]
impl DatasetSource for JfkDataset {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        Ok(vec![RawRecord::new("JFK", "40.6413", "-73.7781")])
    }

    fn describe(&self) -> String {
        "jfk-fixture".to_string()
    }
}

fn jfk_fix() -> Fix {
    Fix::new(40.6413, -73.7781)
}

async fn headless(dir: &Path, sinks: &Arc<RecordingSinks>, fix: Fix) -> Result<FixOutcome> {
    let store = Arc::new(FileStateStore::open(dir)?);
    let ingestor = FixIngestor::cold_start(
        store.as_ref(),
        ProximityMatcher::default(),
        GatePolicy::Latch,
        store.clone(),
        sinks.sinks(),
    )?;
    ingestor.ingest(&fix).await
}

#[tokio::test]
async fn test_foreground_exact_match_fires_once() {
    let store = Arc::new(MemoryStateStore::new());
    let (set, _) = refresh_points(&JfkDataset, store.as_ref()).await.unwrap();
    let recorder = Arc::new(RecordingSinks::default());
    let ingestor = FixIngestor::new(
        Some(Arc::new(set)),
        ProximityMatcher::default(),
        GatePolicy::Latch,
        store.clone(),
        recorder.sinks(),
    );

    ingestor.ingest(&jfk_fix()).await.unwrap();
    ingestor.ingest(&jfk_fix()).await.unwrap();

    let notifications = recorder.notifications.lock().unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].body.contains("JFK"));
    assert!(notifications[0].body.contains("0.00"));

    let events = recorder.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "notification_sent_proximity");
    assert_eq!(events[0].airport_name, "JFK");
    assert_eq!(events[0].distance_meters, 0.0);
}

#[tokio::test]
async fn test_headless_invocations_share_durable_state() {
    let tmp = TempDir::new().unwrap();
    let host_store = FileStateStore::open(tmp.path()).unwrap();
    refresh_points(&JfkDataset, &host_store).await.unwrap();
    let recorder = Arc::new(RecordingSinks::default());

    let first = headless(tmp.path(), &recorder, jfk_fix()).await.unwrap();
    let second = headless(tmp.path(), &recorder, jfk_fix()).await.unwrap();

    assert!(matches!(first, FixOutcome::Fired { distance_meters, .. } if distance_meters == 0.0));
    assert!(matches!(second, FixOutcome::Suppressed { .. }));
    assert_eq!(recorder.notification_count(), 1);
    assert!(recorder.notifications.lock().unwrap()[0].body.contains("0.00"));
}

#[tokio::test]
async fn test_headless_without_dataset_is_idle() {
    let tmp = TempDir::new().unwrap();
    let recorder = Arc::new(RecordingSinks::default());

    let outcome = headless(tmp.path(), &recorder, jfk_fix()).await.unwrap();

    assert_eq!(outcome, FixOutcome::NoPointSet);
    assert_eq!(recorder.notification_count(), 0);
}

#[tokio::test]
async fn test_headless_corrupt_points_aborts() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("points.json"), b"{\"truncated\": ").unwrap();
    let recorder = Arc::new(RecordingSinks::default());

    let err = headless(tmp.path(), &recorder, jfk_fix()).await.unwrap_err();

    assert!(matches!(err, ProximityError::StorageFailure { .. }));
    assert_eq!(recorder.notification_count(), 0);
}

#[test]
fn test_concurrent_headless_invocations_fire_once() {
    const INVOCATIONS: usize = 6;

    let tmp = TempDir::new().unwrap();
    let store = FileStateStore::open(tmp.path()).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    runtime.block_on(refresh_points(&JfkDataset, &store)).unwrap();

    let recorder = Arc::new(RecordingSinks::default());
    let barrier = Arc::new(Barrier::new(INVOCATIONS));

    let handles: Vec<_> = (0..INVOCATIONS)
        .map(|_| {
            let dir = tmp.path().to_path_buf();
            let recorder = Arc::clone(&recorder);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
                barrier.wait();
                runtime.block_on(headless(&dir, &recorder, jfk_fix())).unwrap()
            })
        })
        .collect();

    let outcomes: Vec<FixOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let fired = outcomes.iter().filter(|o| matches!(o, FixOutcome::Fired { .. })).count();
    let suppressed = outcomes.iter().filter(|o| matches!(o, FixOutcome::Suppressed { .. })).count();
    assert_eq!(fired, 1);
    assert_eq!(suppressed, INVOCATIONS - 1);
    assert_eq!(recorder.notification_count(), 1);
    assert!(store.snapshot().unwrap().is_suppressed("JFK"));
    assert_eq!(store.load_points().unwrap().map(|s| s.len()), Some(1));
}

#[tokio::test]
async fn test_waiting_on_the_state_lock_keeps_the_runtime_responsive() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(FileStateStore::open(tmp.path()).unwrap());
    let (set, _) = refresh_points(&JfkDataset, store.as_ref()).await.unwrap();
    let recorder = Arc::new(RecordingSinks::default());
    let ingestor = FixIngestor::new(
        Some(Arc::new(set)),
        ProximityMatcher::default(),
        GatePolicy::Latch,
        store.clone(),
        recorder.sinks(),
    );

    // Another invocation holds the suppression lock
    let other = FileStateStore::open(tmp.path()).unwrap();
    let held = other.begin().unwrap();

    let fix = jfk_fix();
    let ingest = ingestor.ingest(&fix);
    tokio::pin!(ingest);

    tokio::select! {
        _ = &mut ingest => panic!("fix completed while the suppression lock was held"),
        _ = tokio::time::sleep(Duration::from_millis(100)) => {}
    }
    assert_eq!(recorder.notification_count(), 0);

    drop(held);
    let outcome = ingest.await.unwrap();

    assert!(matches!(outcome, FixOutcome::Fired { .. }));
    assert_eq!(recorder.notification_count(), 1);
}
