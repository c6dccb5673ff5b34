//! Session middleware configuration.
//!
//! Sessions hold each visitor's key-value store and toast queue. They are
//! kept in process memory, so restarting the server logs everyone out and
//! empties every cart.
//!
//! The store is a bounded `moka` cache. Each record is evicted at its own
//! expiry date, and the least recently used records go first once the
//! configured capacity is reached, so abandoned sessions never pile up.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::{SessionManagerLayer, session_store};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "glownest_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Evicts each record when its `expiry_date` passes.
struct RecordExpiry;

impl RecordExpiry {
    fn remaining(record: &Record) -> Duration {
        Duration::try_from(record.expiry_date - OffsetDateTime::now_utc())
            .unwrap_or(Duration::ZERO)
    }
}

impl Expiry<Id, Record> for RecordExpiry {
    fn expire_after_create(
        &self,
        _id: &Id,
        record: &Record,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Self::remaining(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(Self::remaining(record))
    }
}

/// In-memory session store with bounded capacity and per-record expiry.
#[derive(Clone)]
pub struct SessionCache {
    records: Cache<Id, Record>,
}

impl SessionCache {
    /// Create a store holding at most `capacity` sessions.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        let records = Cache::builder()
            .max_capacity(capacity)
            .expire_after(RecordExpiry)
            .build();
        Self { records }
    }

    /// Number of sessions currently held.
    ///
    /// Eviction is applied lazily; call [`Self::run_pending_tasks`] first for
    /// an exact count.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.records.entry_count()
    }

    /// Whether no sessions are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply pending evictions.
    pub async fn run_pending_tasks(&self) {
        self.records.run_pending_tasks().await;
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("len", &self.records.entry_count())
            .finish()
    }
}

#[async_trait]
impl session_store::SessionStore for SessionCache {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .records
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer over a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<SessionCache> {
    SessionManagerLayer::new(SessionCache::new(config.session_capacity))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(tower_sessions::Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
