//! SQLite implementation of the haiku store contract

use async_trait::async_trait;
use chrono::SubsecRound;
use haiku_common::validator::syllable_counts;
use haiku_common::{
    time, HaikuId, HaikuLines, HaikuRecord, HaikuStore, StoreError, StoreResult, UpstreamError,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::db::haikus;
use crate::pagination::clamp_page;

/// Haiku store over a SQLite pool.
///
/// Cloning is cheap and clones share the pool and the write lock.
#[derive(Clone)]
pub struct SqliteHaikuStore {
    pool: SqlitePool,
    /// Serializes writes issued through this store. Timestamps are taken
    /// under the lock, so id order and `created_at` order agree.
    write_lock: Arc<Mutex<()>>,
}

impl SqliteHaikuStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Records whose text contains `query`, oldest first
    pub async fn search(&self, query: &str, limit: i64, offset: i64) -> StoreResult<Vec<HaikuRecord>> {
        let page = clamp_page(limit, offset);
        haikus::search_haikus(&self.pool, query, page.limit, page.offset).await
    }

    pub async fn count(&self) -> StoreResult<i64> {
        haikus::count_haikus(&self.pool).await
    }
}

fn task_failed(err: tokio::task::JoinError) -> StoreError {
    StoreError::Unavailable(UpstreamError::unreachable(format!("store write task failed: {err}")))
}

#[async_trait]
impl HaikuStore for SqliteHaikuStore {
    async fn create(&self, lines: HaikuLines) -> StoreResult<HaikuRecord> {
        let pool = self.pool.clone();
        let write_lock = Arc::clone(&self.write_lock);

        // The write runs on its own task: once started it completes even if
        // the caller is dropped (client disconnect, timeout).
        let record = tokio::spawn(async move {
            let _guard = write_lock.lock().await;
            let syllable_counts = syllable_counts(&lines);
            let created_at = time::now().trunc_subsecs(6);
            let id = haikus::insert_haiku(&pool, &lines, syllable_counts, created_at).await?;
            Ok::<_, StoreError>(HaikuRecord {
                id,
                lines,
                created_at,
                syllable_counts,
            })
        })
        .await
        .map_err(task_failed)??;

        info!(id = %record.id, counts = ?record.syllable_counts, "Haiku created");
        Ok(record)
    }

    async fn get(&self, id: HaikuId) -> StoreResult<HaikuRecord> {
        haikus::load_haiku(&self.pool, id).await
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<HaikuRecord>> {
        let page = clamp_page(limit, offset);
        debug!(limit = page.limit, offset = page.offset, "Listing haikus");
        haikus::list_haikus(&self.pool, page.limit, page.offset).await
    }

    async fn delete(&self, id: HaikuId) -> StoreResult<()> {
        let pool = self.pool.clone();
        let write_lock = Arc::clone(&self.write_lock);

        tokio::spawn(async move {
            let _guard = write_lock.lock().await;
            haikus::delete_haiku(&pool, id).await
        })
        .await
        .map_err(task_failed)??;

        info!(id = %id, "Haiku deleted");
        Ok(())
    }
}
