//! Cache Facade
//!
//! Read-through access plus the invalidation policy for every cached entity.
//! Any write to an entity must call its `invalidate_*` helper before the
//! write is reported as successful.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::keys::{self, patterns};
use crate::cache::store::KvStore;
use crate::cache::ttl::Ttl;

// == Cache ==
/// Cheaply cloneable handle over a shared store adapter.
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<KvStore>,
}

impl Cache {
    pub fn new(store: KvStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Facade whose every read falls through to the data source.
    pub fn disabled() -> Self {
        Self::new(KvStore::disabled())
    }

    pub fn store(&self) -> &KvStore {
        &self.store
    }

    // == Get Cached ==
    /// Returns the cached value for `key`, or runs `compute`, stores its
    /// result for `ttl` and returns it.
    ///
    /// Errors from `compute` are returned unchanged and nothing is cached.
    /// Concurrent misses on the same key each run `compute`; the last write
    /// wins.
    pub async fn get_cached<T, E, F, Fut>(&self, key: &str, ttl: Ttl, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.store.get::<T>(key).await {
            return Ok(hit);
        }

        let value = compute().await?;
        self.store.set_with_expiry(key, ttl.as_secs(), &value).await;
        Ok(value)
    }

    // == Generic Invalidation ==
    /// Deletes fixed keys.
    pub async fn invalidate_keys(&self, keys: &[String]) {
        self.store.delete(keys).await;
    }

    /// Deletes every key matching `pattern`, returning how many were found.
    ///
    /// Listing and deleting are separate round trips, so a key written in
    /// between survives until its TTL.
    pub async fn invalidate_pattern(&self, pattern: &str) -> usize {
        let matched = self.store.list_keys(pattern).await;
        let count = matched.len();
        self.store.delete(&matched).await;
        debug!(pattern, count, "invalidated keys by pattern");
        count
    }

    /// Drops the whole cache.
    pub async fn flush_all(&self) {
        self.store.flush_all().await;
    }

    // == Entity Invalidation ==
    /// After any booking create, update or delete.
    pub async fn invalidate_bookings(&self) {
        self.invalidate_keys(&[keys::bookings_count()]).await;
        self.invalidate_pattern(&patterns::bookings()).await;
    }

    /// After a customer of `team_id` is created or removed.
    pub async fn invalidate_customers(&self, team_id: i32) {
        self.invalidate_keys(&[keys::customers_count(team_id)]).await;
        self.invalidate_pattern(&patterns::customers(team_id)).await;
    }

    /// After a customer row changes.
    pub async fn invalidate_customer(&self, customer_id: i32, team_id: i32) {
        self.invalidate_keys(&[keys::customer(customer_id)]).await;
        self.invalidate_customers(team_id).await;
    }

    /// After any staff create, update or delete in `team_id`.
    pub async fn invalidate_staff(&self, team_id: i32) {
        self.invalidate_keys(&[keys::staff_count(team_id)]).await;
        self.invalidate_pattern(&patterns::staff(team_id)).await;
    }

    /// After a service record of a customer changes. Revenue aggregates
    /// derive from service records, so the team dashboard goes too.
    pub async fn invalidate_service_records(&self, customer_id: i32, team_id: i32) {
        self.invalidate_keys(&[keys::service_records(customer_id)])
            .await;
        self.invalidate_dashboard(team_id).await;
    }

    /// Dashboard aggregates of a team.
    pub async fn invalidate_dashboard(&self, team_id: i32) {
        self.invalidate_keys(&[
            keys::dashboard_revenue(team_id),
            keys::service_records_count(team_id),
            keys::daily_revenue(team_id),
            keys::yearly_breakup(team_id),
            keys::monthly_earnings(team_id),
        ])
        .await;
    }
}
