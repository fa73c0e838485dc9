use crate::domain::ports::ReviewStore;
use crate::domain::review::{NewReview, ReviewRecord, ReviewStatus};
use crate::error::{Result, ReviewError};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing completed reviews.
pub const CF_REVIEWS: &str = "reviews";

/// A persistent review store backed by RocksDB.
///
/// Keys are big-endian record ids, so iteration order is creation order.
/// Values are JSON-encoded `ReviewRecord`s.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBReviewStore {
    db: Arc<DB>,
    // Serializes id allocation and read-modify-write status updates.
    write_lock: Arc<Mutex<u64>>,
}

impl RocksDBReviewStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// The next id is recovered from the highest key already stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_reviews = ColumnFamilyDescriptor::new(CF_REVIEWS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_reviews])?;

        let last_id = {
            let cf = reviews_cf(&db)?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _value) = item?;
                    decode_id(&key)?
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(last_id)),
        })
    }

    fn all_records(&self) -> Result<Vec<ReviewRecord>> {
        let cf = reviews_cf(&self.db)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice::<ReviewRecord>(&value)?);
        }
        Ok(records)
    }
}

fn reviews_cf(db: &DB) -> Result<&ColumnFamily> {
    db.cf_handle(CF_REVIEWS)
        .ok_or_else(|| ReviewError::StorageError("Reviews column family not found".to_string()))
}

fn decode_id(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        ReviewError::StorageError(format!("Malformed review key of {} bytes", key.len()))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

#[async_trait]
impl ReviewStore for RocksDBReviewStore {
    async fn create(&self, review: NewReview) -> Result<ReviewRecord> {
        let mut last_id = self.write_lock.lock().await;
        let id = *last_id + 1;
        let record = ReviewRecord::from_new(id, review, Utc::now());

        let cf = reviews_cf(&self.db)?;
        self.db
            .put_cf(cf, id.to_be_bytes(), serde_json::to_vec(&record)?)?;

        *last_id = id;
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<ReviewRecord>> {
        let mut records = self.all_records()?;
        records.sort_by(ReviewRecord::newest_first);
        Ok(records)
    }

    async fn bulk_update_status(&self, from: &ReviewStatus, to: &ReviewStatus) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let cf = reviews_cf(&self.db)?;

        let mut updated = 0;
        for mut record in self.all_records()? {
            if &record.status == from {
                record.status = to.clone();
                self.db
                    .put_cf(cf, record.id.to_be_bytes(), serde_json::to_vec(&record)?)?;
                updated += 1;
            }
        }

        Ok(updated)
    }
}
