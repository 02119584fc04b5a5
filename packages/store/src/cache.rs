//! # Client-side query cache with stale-marking invalidation
//!
//! [`QueryCache`] is the process-wide cache shared by every component in a
//! session. Entries are keyed by [`CacheKey`] — (table, filter signature)
//! for list results, (table, row id) for single rows — and hold
//! `serde_json::Value` snapshots so one map serves every entity type.
//!
//! ## Invalidation
//!
//! [`QueryCache::invalidate`] processes one decoded [`ChangeEvent`] and
//! marks entries **stale without evicting them**:
//!
//! - every list entry for the event's table (a changed row may enter or
//!   leave any filtered view),
//! - every list entry for the table's [`Table::dependents`],
//! - the row entries named by [`ChangeEvent::touched_rows`].
//!
//! Redundant passes within a short window are not de-duplicated; each
//! event runs its own pass.
//!
//! ## Reads
//!
//! Reads never block on invalidation. [`QueryCache::read`] reports
//! [`CacheRead::Fresh`], [`CacheRead::Stale`] (last-known value, still
//! usable), or [`CacheRead::Miss`]. [`QueryCache::fetch_with`] is the
//! read-through helper: it returns a cached fresh value without a fetch,
//! performs exactly one re-fetch on stale/miss, and keeps the stale value
//! visible when the fetch fails.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::events::ChangeEvent;
use crate::models::Table;

/// Scope of a cached result within one table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// A list result, keyed by the canonical filter signature.
    List(String),
    /// A single row, keyed by id.
    Row(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub table: Table,
    pub scope: Scope,
}

impl CacheKey {
    pub fn list(table: Table, signature: impl Into<String>) -> Self {
        Self {
            table,
            scope: Scope::List(signature.into()),
        }
    }

    pub fn row(table: Table, id: impl Into<String>) -> Self {
        Self {
            table,
            scope: Scope::Row(id.into()),
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    value: Value,
    fresh: bool,
}

/// Outcome of a plain cache read.
#[derive(Clone, Debug, PartialEq)]
pub enum CacheRead {
    Fresh(Value),
    Stale(Value),
    Miss,
}

/// Outcome of a read-through fetch.
#[derive(Debug)]
pub enum Fetched<T, E> {
    /// Served straight from a fresh cache entry; no fetch happened.
    Cached(T),
    /// Re-fetched and cached.
    Fetched(T),
    /// The fetch failed; the last-known stale value stays visible.
    StaleAfterError(T, E),
    /// The fetch failed and nothing was cached.
    Failed(E),
}

impl<T, E> Fetched<T, E> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Fetched::Cached(v) | Fetched::Fetched(v) | Fetched::StaleAfterError(v, _) => Some(v),
            Fetched::Failed(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Fetched::Cached(v) | Fetched::Fetched(v) | Fetched::StaleAfterError(v, _) => Some(v),
            Fetched::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Fetched::StaleAfterError(_, e) | Fetched::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Process-wide cache of query results.
///
/// Clones share the same map. The runtime has no true parallelism (one
/// UI event loop), so the mutex only provides interior mutability.
#[derive(Clone, Debug, Default)]
pub struct QueryCache {
    slots: Arc<Mutex<HashMap<CacheKey, Slot>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh snapshot, overwriting any previous entry.
    pub fn put(&self, key: CacheKey, value: Value) {
        self.slots.lock().unwrap().insert(
            key,
            Slot {
                value,
                fresh: true,
            },
        );
    }

    pub fn read(&self, key: &CacheKey) -> CacheRead {
        match self.slots.lock().unwrap().get(key) {
            Some(slot) if slot.fresh => CacheRead::Fresh(slot.value.clone()),
            Some(slot) => CacheRead::Stale(slot.value.clone()),
            None => CacheRead::Miss,
        }
    }

    /// Mark everything affected by one change event stale.
    pub fn invalidate(&self, event: &ChangeEvent) {
        let table = event.table();
        self.mark_lists_stale(table);
        for dependent in table.dependents() {
            self.mark_lists_stale(*dependent);
        }
        for (table, id) in event.touched_rows() {
            self.mark_row_stale(table, &id);
        }
    }

    fn mark_lists_stale(&self, table: Table) {
        let mut slots = self.slots.lock().unwrap();
        for (key, slot) in slots.iter_mut() {
            if key.table == table && matches!(key.scope, Scope::List(_)) {
                slot.fresh = false;
            }
        }
    }

    fn mark_row_stale(&self, table: Table, id: &str) {
        let mut slots = self.slots.lock().unwrap();
        if let Some(slot) = slots.get_mut(&CacheKey::row(table, id)) {
            slot.fresh = false;
        }
    }

    /// Drop every entry. Used on sign-out so the next session starts cold.
    pub fn clear(&self) {
        self.slots.lock().unwrap().clear();
    }

    /// Read-through fetch: fresh hits skip the fetch, stale/miss fetch
    /// exactly once, and a failed fetch falls back to the stale value.
    pub async fn fetch_with<T, E, F, Fut>(&self, key: CacheKey, fetch: F) -> Fetched<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let stale = match self.read(&key) {
            CacheRead::Fresh(value) => match serde_json::from_value(value) {
                Ok(typed) => return Fetched::Cached(typed),
                // Snapshot no longer matches the type; treat as a miss.
                Err(_) => None,
            },
            CacheRead::Stale(value) => Some(value),
            CacheRead::Miss => None,
        };

        match fetch().await {
            Ok(typed) => {
                if let Ok(snapshot) = serde_json::to_value(&typed) {
                    self.put(key, snapshot);
                }
                Fetched::Fetched(typed)
            }
            Err(err) => match stale.and_then(|v| serde_json::from_value(v).ok()) {
                Some(last_known) => Fetched::StaleAfterError(last_known, err),
                None => Fetched::Failed(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ChangeKind, RawChange};
    use crate::models::Car;
    use serde_json::json;
    use std::cell::Cell;

    fn booking_cancelled_event() -> ChangeEvent {
        let raw = RawChange {
            kind: ChangeKind::Update,
            old: json!({}),
            new: json!({
                "id": "b1",
                "car_id": "c7",
                "customer_id": "u1",
                "dealership_id": "d1",
                "status": "cancelled",
                "start_date": "2026-09-01T09:00:00Z",
                "end_date": "2026-09-03T09:00:00Z",
                "total_price": 120.0,
                "created_at": "2026-08-20T10:00:00Z",
            }),
        };
        ChangeEvent::decode(Table::Bookings, &raw).unwrap()
    }

    fn car_insert_event(id: &str) -> ChangeEvent {
        let raw = RawChange {
            kind: ChangeKind::Insert,
            old: json!({}),
            new: json!({
                "id": id,
                "dealership_id": "d1",
                "brand": "Fiat",
                "model": "Panda",
                "category": "compact",
                "daily_rate": 25.0,
                "status": "approved",
                "available": true,
                "city": "Porto",
                "latitude": null,
                "longitude": null,
                "image_urls": [],
                "created_at": "2026-08-01T10:00:00Z",
            }),
        };
        ChangeEvent::decode(Table::Cars, &raw).unwrap()
    }

    #[test]
    fn invalidation_marks_every_list_for_the_table_stale() {
        let cache = QueryCache::new();
        cache.put(CacheKey::list(Table::Cars, "city=eq.porto"), json!([1]));
        cache.put(CacheKey::list(Table::Cars, "category=eq.suv"), json!([2]));
        cache.put(CacheKey::list(Table::Dealerships, ""), json!([3]));

        cache.invalidate(&car_insert_event("c9"));

        assert!(matches!(
            cache.read(&CacheKey::list(Table::Cars, "city=eq.porto")),
            CacheRead::Stale(_)
        ));
        assert!(matches!(
            cache.read(&CacheKey::list(Table::Cars, "category=eq.suv")),
            CacheRead::Stale(_)
        ));
        // Unrelated tables keep their freshness.
        assert!(matches!(
            cache.read(&CacheKey::list(Table::Dealerships, "")),
            CacheRead::Fresh(_)
        ));
    }

    #[test]
    fn booking_cancellation_invalidates_bookings_cars_and_the_car_row() {
        let cache = QueryCache::new();
        cache.put(CacheKey::list(Table::Bookings, ""), json!([1]));
        cache.put(CacheKey::list(Table::Cars, ""), json!([2]));
        cache.put(CacheKey::row(Table::Cars, "c7"), json!({"id": "c7"}));
        cache.put(CacheKey::row(Table::Cars, "c8"), json!({"id": "c8"}));

        cache.invalidate(&booking_cancelled_event());

        assert!(matches!(
            cache.read(&CacheKey::list(Table::Bookings, "")),
            CacheRead::Stale(_)
        ));
        assert!(matches!(
            cache.read(&CacheKey::list(Table::Cars, "")),
            CacheRead::Stale(_)
        ));
        assert!(matches!(
            cache.read(&CacheKey::row(Table::Cars, "c7")),
            CacheRead::Stale(_)
        ));
        // A different car's row entry is untouched.
        assert!(matches!(
            cache.read(&CacheKey::row(Table::Cars, "c8")),
            CacheRead::Fresh(_)
        ));
    }

    #[test]
    fn invalidation_marks_stale_but_never_evicts() {
        let cache = QueryCache::new();
        cache.put(CacheKey::list(Table::Cars, ""), json!(["kept"]));
        cache.invalidate(&car_insert_event("c1"));

        let CacheRead::Stale(value) = cache.read(&CacheKey::list(Table::Cars, "")) else {
            panic!("expected a stale entry, not an eviction");
        };
        assert_eq!(value, json!(["kept"]));
    }

    #[tokio::test]
    async fn fresh_entries_are_served_without_a_fetch() {
        let cache = QueryCache::new();
        cache.put(CacheKey::list(Table::Cars, ""), json!(["cached"]));

        let fetches = Cell::new(0u32);
        let outcome: Fetched<Vec<String>, String> = cache
            .fetch_with(CacheKey::list(Table::Cars, ""), || async {
                fetches.set(fetches.get() + 1);
                Ok(vec!["fetched".to_string()])
            })
            .await;

        assert!(matches!(outcome, Fetched::Cached(_)));
        assert_eq!(fetches.get(), 0);
    }

    #[tokio::test]
    async fn stale_entries_refetch_exactly_once() {
        let cache = QueryCache::new();
        cache.put(CacheKey::list(Table::Cars, ""), json!(["old"]));
        cache.invalidate(&car_insert_event("c1"));

        let fetches = Cell::new(0u32);
        let outcome: Fetched<Vec<String>, String> = cache
            .fetch_with(CacheKey::list(Table::Cars, ""), || async {
                fetches.set(fetches.get() + 1);
                Ok(vec!["new".to_string()])
            })
            .await;

        assert_eq!(fetches.get(), 1);
        assert_eq!(outcome.into_value().unwrap(), vec!["new".to_string()]);

        // Entry is fresh again: the next read does not fetch.
        let outcome: Fetched<Vec<String>, String> = cache
            .fetch_with(CacheKey::list(Table::Cars, ""), || async {
                fetches.set(fetches.get() + 1);
                Ok(vec!["newer".to_string()])
            })
            .await;
        assert_eq!(fetches.get(), 1);
        assert!(matches!(outcome, Fetched::Cached(_)));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_the_stale_value_visible() {
        let cache = QueryCache::new();
        cache.put(CacheKey::list(Table::Cars, ""), json!(["last-known"]));
        cache.invalidate(&car_insert_event("c1"));

        let outcome: Fetched<Vec<String>, String> = cache
            .fetch_with(CacheKey::list(Table::Cars, ""), || async {
                Err("network down".to_string())
            })
            .await;

        match outcome {
            Fetched::StaleAfterError(rows, err) => {
                assert_eq!(rows, vec!["last-known".to_string()]);
                assert_eq!(err, "network down");
            }
            other => panic!("expected StaleAfterError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_fetch_with_no_cache_reports_failure() {
        let cache = QueryCache::new();
        let outcome: Fetched<Vec<String>, String> = cache
            .fetch_with(CacheKey::list(Table::Cars, ""), || async {
                Err("network down".to_string())
            })
            .await;
        assert!(matches!(outcome, Fetched::Failed(_)));
        assert!(outcome.value().is_none());
    }

    #[tokio::test]
    async fn typed_round_trip_through_the_cache() {
        let cache = QueryCache::new();
        let outcome: Fetched<Car, String> = cache
            .fetch_with(CacheKey::row(Table::Cars, "c1"), || async {
                Ok(serde_json::from_value(json!({
                    "id": "c1",
                    "dealership_id": "d1",
                    "brand": "Fiat",
                    "model": "Panda",
                    "category": "compact",
                    "daily_rate": 25.0,
                    "status": "approved",
                    "available": true,
                    "city": "Porto",
                    "latitude": null,
                    "longitude": null,
                    "image_urls": [],
                    "created_at": "2026-08-01T10:00:00Z",
                }))
                .unwrap())
            })
            .await;
        let car = outcome.into_value().unwrap();
        assert_eq!(car.title(), "Fiat Panda");
        assert!(matches!(
            cache.read(&CacheKey::row(Table::Cars, "c1")),
            CacheRead::Fresh(_)
        ));
    }
}
