//! SQLite-backed store for resolved provider version listings
//!
//! Each provider key maps to exactly one entry holding the full version list
//! and the time it was last refreshed. Whether an entry is still usable is
//! decided by callers through [`is_fresh`].

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::Connection;
use tracing::{debug, error, info};

#[cfg(test)]
use mockall::automock;

use crate::config::{CACHE_BUSY_TIMEOUT_MS, FRESHNESS_WINDOW_SECS};
use crate::provider::error::CacheError;
use crate::provider::types::Version;

/// Maximum age of a cached listing before it must be re-resolved (55 minutes)
pub const FRESHNESS_WINDOW: TimeDelta = TimeDelta::seconds(FRESHNESS_WINDOW_SECS);

/// A cached version listing for one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionListingEntry {
    pub provider: String,
    pub versions: Vec<Version>,
    pub last_updated: DateTime<Utc>,
}

/// Returns true while an entry updated at `last_updated` is within `window` of `now`
pub fn is_fresh(now: DateTime<Utc>, last_updated: DateTime<Utc>, window: TimeDelta) -> bool {
    now - last_updated <= window
}

/// Trait for storing and retrieving version listings
///
/// Calls are synchronous and are not bound to a request deadline. A call
/// blocked on a locked database waits at most `CACHE_BUSY_TIMEOUT_MS`
/// (SQLite `busy_timeout`) before failing with [`CacheError::Database`].
#[cfg_attr(test, automock)]
pub trait VersionListingStore: Send + Sync + 'static {
    /// Replace the entry for `key` with `versions`, stamped with the current time
    fn store(&self, key: &str, versions: &[Version]) -> Result<(), CacheError>;

    /// Get the entry for `key`, or None if nothing has been stored yet
    fn get(&self, key: &str) -> Result<Option<VersionListingEntry>, CacheError>;
}

pub struct CacheStore {
    conn: Mutex<Connection>,
}

impl CacheStore {
    pub fn new(db_path: &Path) -> Result<Self, CacheError> {
        info!("Initializing cache database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(Duration::from_millis(CACHE_BUSY_TIMEOUT_MS))?;

        debug!("Database connection established");

        let store = Self {
            conn: Mutex::new(conn),
        };

        store.create_schema()?;
        info!("Cache initialized successfully");

        Ok(store)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS provider_versions (
                provider TEXT PRIMARY KEY NOT NULL,
                versions TEXT NOT NULL,
                last_updated INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Store `versions` for `key` as of `now`
    ///
    /// The stored timestamp never moves backwards for a key, even if `now`
    /// is older than the previous write.
    pub fn store_at(
        &self,
        key: &str,
        versions: &[Version],
        now: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let encoded = serde_json::to_string(versions).inspect_err(|e| {
            error!("Failed to serialize versions for {}: {}", key, e);
        })?;

        info!(
            "Storing provider versions for {}: {} versions",
            key,
            versions.len()
        );

        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO provider_versions (provider, versions, last_updated)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(provider) DO UPDATE SET
                versions = excluded.versions,
                last_updated = MAX(provider_versions.last_updated, excluded.last_updated)
            "#,
            (key, &encoded, now.timestamp_millis()),
        )
        .inspect_err(|e| error!("Failed to store versions for {}: {}", key, e))?;

        info!(
            "Successfully stored provider versions for {}: {} versions",
            key,
            versions.len()
        );
        Ok(())
    }
}

impl VersionListingStore for CacheStore {
    fn store(&self, key: &str, versions: &[Version]) -> Result<(), CacheError> {
        self.store_at(key, versions, Utc::now())
    }

    fn get(&self, key: &str) -> Result<Option<VersionListingEntry>, CacheError> {
        let conn = self.lock_conn()?;
        let result = conn.query_row(
            "SELECT versions, last_updated FROM provider_versions WHERE provider = ?1",
            [key],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        );

        let (encoded, last_updated_ms) = match result {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let versions: Vec<Version> = serde_json::from_str(&encoded)?;
        let last_updated = DateTime::from_timestamp_millis(last_updated_ms)
            .ok_or_else(|| CacheError::InvalidTimestamp(key.to_string()))?;

        Ok(Some(VersionListingEntry {
            provider: key.to_string(),
            versions,
            last_updated,
        }))
    }
}
