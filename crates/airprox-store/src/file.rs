//! File-backed durable key-value store.
//!
//! Each stable key is a JSON file inside the state directory. Writes go to a
//! temporary sibling that is synced and renamed into place, so readers see
//! either the old or the new value. Suppression transactions hold an
//! exclusive OS lock on `suppression.lock` for their whole lifetime, which
//! serializes the check-then-commit sequence across processes.

use airprox_core::error::{ProximityError, Result};
use airprox_core::models::{PointOfInterestSet, SuppressionState, POINTS_KEY, SUPPRESSION_KEY};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ports::{PointSetStore, SuppressionStore, SuppressionTransaction};

const LOCK_FILE: &str = "suppression.lock";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// State store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Open (creating if needed) the state directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            ProximityError::storage(dir.display().to_string(), format!("cannot create: {}", e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read_key(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.key_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProximityError::storage(key, e)),
        }
    }

    fn write_key(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let target = self.key_path(key);
        let tmp = self.dir.join(format!(
            "{}.json.{}.{}.tmp",
            key,
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&tmp, &target)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            ProximityError::storage(key, e)
        })
    }

    fn lock(&self) -> Result<File> {
        let path = self.dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| ProximityError::storage(SUPPRESSION_KEY, e))?;
        file.lock().map_err(|e| ProximityError::storage(SUPPRESSION_KEY, e))?;
        Ok(file)
    }
}

impl PointSetStore for FileStateStore {
    fn save_points(&self, set: &PointOfInterestSet) -> Result<()> {
        let bytes = set.serialize()?;
        self.write_key(POINTS_KEY, &bytes)?;
        tracing::debug!("Persisted {} points to {}", set.len(), self.key_path(POINTS_KEY).display());
        Ok(())
    }

    fn load_points(&self) -> Result<Option<PointOfInterestSet>> {
        self.read_key(POINTS_KEY)?.map(|bytes| PointOfInterestSet::deserialize(&bytes)).transpose()
    }
}

/// Transaction owning the exclusive lock file handle
struct FileSuppressionTransaction<'a> {
    store: &'a FileStateStore,
    state: SuppressionState,
    // Released when the handle is closed
    _lock: File,
}

impl SuppressionTransaction for FileSuppressionTransaction<'_> {
    fn state(&self) -> &SuppressionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SuppressionState {
        &mut self.state
    }

    fn commit(self: Box<Self>) -> Result<()> {
        let bytes = self.state.serialize()?;
        self.store.write_key(SUPPRESSION_KEY, &bytes)
    }
}

impl SuppressionStore for FileStateStore {
    fn begin(&self) -> Result<Box<dyn SuppressionTransaction + '_>> {
        let lock = self.lock()?;
        let state = match self.read_key(SUPPRESSION_KEY)? {
            Some(bytes) => SuppressionState::deserialize(&bytes)?,
            None => SuppressionState::new(),
        };
        Ok(Box::new(FileSuppressionTransaction { store: self, state, _lock: lock }))
    }
}
