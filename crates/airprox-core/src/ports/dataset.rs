use async_trait::async_trait;

use crate::error::Result;
use crate::models::RawRecord;

/// Port for retrieving the raw airport dataset
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch every raw record, in dataset order.
    ///
    /// Failing to reach the dataset at all is a `DatasetUnreachable` error;
    /// malformed individual records are returned as-is and rejected at load.
    async fn fetch(&self) -> Result<Vec<RawRecord>>;

    /// Short label for logs (file path or URL)
    fn describe(&self) -> String;
}
