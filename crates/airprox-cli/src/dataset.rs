//! Dataset sources: a local JSON file or an HTTP endpoint

use airprox_core::error::{ProximityError, Result};
use airprox_core::models::RawRecord;
use airprox_core::ports::DatasetSource;
use async_trait::async_trait;
use std::path::PathBuf;

/// JSON array of airport records on disk
pub struct FileDatasetSource {
    path: PathBuf,
}

impl FileDatasetSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn unreachable(&self, reason: impl ToString) -> ProximityError {
        ProximityError::DatasetUnreachable { source_name: self.describe(), reason: reason.to_string() }
    }
}

#[async_trait]
impl DatasetSource for FileDatasetSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| self.unreachable(e))?;
        serde_json::from_slice(&bytes).map_err(|e| self.unreachable(format!("invalid dataset JSON: {}", e)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// JSON array of airport records served over HTTP
pub struct HttpDatasetSource {
    url: String,
    client: reqwest::Client,
}

impl HttpDatasetSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), client: reqwest::Client::new() }
    }

    fn unreachable(&self, reason: impl ToString) -> ProximityError {
        ProximityError::DatasetUnreachable { source_name: self.describe(), reason: reason.to_string() }
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.unreachable(e))?;

        response.json::<Vec<RawRecord>>().await.map_err(|e| self.unreachable(e))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_file_source_reads_records() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "JFK", "iata": "JFK", "lat": "40.6413", "lon": "-73.7781", "status": 1}},
               {{"name": "Broken", "lat": "n/a", "lon": "0"}}]"#
        )
        .unwrap();

        let records = FileDatasetSource::new(file.path().to_path_buf()).fetch().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].iata.as_deref(), Some("JFK"));
        assert_eq!(records[1].lat.as_deref(), Some("n/a"));
    }

    #[tokio::test]
    async fn test_missing_file_is_unreachable() {
        let source = FileDatasetSource::new(PathBuf::from("/nonexistent/airports.json"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, ProximityError::DatasetUnreachable { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_unreachable() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<html>not found</html>").unwrap();

        let err = FileDatasetSource::new(file.path().to_path_buf()).fetch().await.unwrap_err();
        assert!(matches!(err, ProximityError::DatasetUnreachable { .. }));
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_unreachable() {
        let source = HttpDatasetSource::new("http://airprox.invalid/airports.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, ProximityError::DatasetUnreachable { ref source_name, .. }
            if source_name == "http://airprox.invalid/airports.json"));
    }
}
