use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};
use tracing::{debug, warn};

use crate::utils::time::date_to_record_name;

use super::{entities::WorkRecord, RecordProvider};

/// The main realization of [RecordProvider], reading day files from a directory.
pub struct RecordStorageImpl {
    record_dir: PathBuf,
}

impl RecordStorageImpl {
    pub fn new(record_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&record_dir)?;

        Ok(Self { record_dir })
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.record_dir.join(date_to_record_name(date))
    }

    async fn get_all_inner(&self, path: &Path) -> Result<Vec<WorkRecord>> {
        async fn extract(path: &Path) -> std::result::Result<Vec<WorkRecord>, std::io::Error> {
            debug!("Extracting {path:?}");
            let file = File::open(path).await?;
            file.lock_shared()?;
            let buffer = BufReader::new(file);
            let mut lines = buffer.lines();
            let mut records = vec![];
            while let Some(v) = lines.next_line().await? {
                if v.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<WorkRecord>(&v) {
                    Ok(v) => records.push(v),
                    Err(e) => {
                        // A hand edited file shouldn't hide the rest of the day.
                        warn!(
                            "During parsing in path {:?} found illegal json string {}:  {e}",
                            path, &v
                        )
                    }
                }
            }

            lines.into_inner().into_inner().unlock_async().await?;

            Ok(records)
        }

        match extract(path).await {
            Ok(s) => Ok(s),
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    Ok(vec![])
                } else {
                    Err(e)?
                }
            }
        }
    }
}

#[async_trait]
impl RecordProvider for RecordStorageImpl {
    async fn fetch_day(&self, date: NaiveDate) -> Result<Vec<WorkRecord>> {
        let path = self.path_for(date);
        self.get_all_inner(&path).await
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::provider::{entities::WorkRecord, RecordProvider};

    use super::RecordStorageImpl;

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2018, 7, 4).unwrap();

    #[tokio::test]
    async fn test_record_storage_basic() -> Result<()> {
        let dir = tempdir()?;
        let storage = RecordStorageImpl::new(dir.path().to_owned())?;
        let records = [
            WorkRecord::new(1, "08:00", Some("09:00"), "Acme").with_ticket("T-1"),
            WorkRecord::new(2, "09:30", None, "Initech").with_group("Ops"),
        ];
        let mut contents = String::new();
        for record in &records {
            contents += &serde_json::to_string(record)?;
            contents.push('\n');
        }
        fs::write(storage.path_for(TEST_DATE), contents)?;

        let values = storage.fetch_day(TEST_DATE).await?;

        assert_eq!(values, records.to_vec());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_day_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let storage = RecordStorageImpl::new(dir.path().to_owned())?;

        assert!(storage.fetch_day(TEST_DATE).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_illegal_lines_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let storage = RecordStorageImpl::new(dir.path().to_owned())?;
        fs::write(
            storage.path_for(TEST_DATE),
            "{\"id\":1,\"startTime\":\"08:00\",\"client\":\"Acme\"}\n{\"id\":2,\"sta\n\n",
        )?;

        let values = storage.fetch_day(TEST_DATE).await?;

        assert_eq!(values, vec![WorkRecord::new(1, "08:00", None, "Acme")]);
        Ok(())
    }
}
