//! Record providers hand the engine a complete list of a day's entries.
//! The bundled provider is [record_storage::RecordStorageImpl]:
//!   - There is a directory with all the records.
//!   - Every day has its own file named `YYYY-MM-DD`.
//!   - A file holds one JSON encoded [entities::WorkRecord] per line.

pub mod entities;
pub mod record_storage;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use entities::WorkRecord;

#[cfg(test)]
use mockall::automock;

/// Source of a day's raw records. A fetch either yields every record of the day or an error,
/// never a partial list.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecordProvider: Send + Sync {
    async fn fetch_day(&self, date: NaiveDate) -> Result<Vec<WorkRecord>>;
}

