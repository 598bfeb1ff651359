// ── Generic reactive resource collection ──
//
// Concurrent storage for one fetched collection plus its loading/error
// metadata, with push-based change notification via `watch` channels.
// Mutations rebuild the snapshot subscribers receive; insertion order is
// preserved so list views stay stable across updates.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tokio::sync::watch;

use crate::error::CoreError;

/// Record with a server-assigned integer identity.
pub trait Keyed {
    fn key(&self) -> i64;
}

pub(crate) struct ResourceCollection<T> {
    /// Primary storage: id -> record.
    by_id: DashMap<i64, Arc<T>>,

    /// Insertion order of ids, for stable snapshots.
    order: RwLock<Vec<i64>>,

    /// Full snapshot, rebuilt on mutation for cheap subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,

    /// True while a refresh or mutation is in flight.
    loading: watch::Sender<bool>,

    /// Most recent failure, cleared by the next successful operation.
    error: watch::Sender<Option<CoreError>>,
}

impl<T: Keyed + Send + Sync + 'static> ResourceCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);

        Self {
            by_id: DashMap::new(),
            order: RwLock::new(Vec::new()),
            snapshot,
            loading,
            error,
        }
    }

    // ── Collection mutations ────────────────────────────────────────

    /// Replace the whole collection with a freshly fetched snapshot.
    pub(crate) fn replace_all(&self, records: Vec<T>) {
        let mut order = self.write_order();
        self.by_id.clear();
        order.clear();
        for record in records {
            let id = record.key();
            if self.by_id.insert(id, Arc::new(record)).is_none() {
                order.push(id);
            }
        }
        drop(order);
        self.rebuild_snapshot();
    }

    /// Insert or replace one record, preserving its position when it
    /// already exists. Returns the stored `Arc`.
    pub(crate) fn upsert(&self, record: T) -> Arc<T> {
        let id = record.key();
        let stored = Arc::new(record);
        let mut order = self.write_order();
        if self.by_id.insert(id, Arc::clone(&stored)).is_none() {
            order.push(id);
        }
        drop(order);
        self.rebuild_snapshot();
        stored
    }

    /// Remove a record by id. Returns the removed record if it existed.
    pub(crate) fn remove(&self, id: i64) -> Option<Arc<T>> {
        let removed = self.by_id.remove(&id).map(|(_, v)| v);
        if removed.is_some() {
            self.write_order().retain(|stored| *stored != id);
            self.rebuild_snapshot();
        }
        removed
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub(crate) fn get(&self, id: i64) -> Option<Arc<T>> {
        self.by_id.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// The current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // ── Loading / error metadata ────────────────────────────────────

    pub(crate) fn set_loading(&self, value: bool) {
        let _ = self.loading.send(value);
    }

    pub(crate) fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub(crate) fn watch_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub(crate) fn record_error(&self, error: &CoreError) {
        let _ = self.error.send(Some(error.clone()));
    }

    pub(crate) fn clear_error(&self) {
        let _ = self.error.send(None);
    }

    pub(crate) fn last_error(&self) -> Option<CoreError> {
        self.error.borrow().clone()
    }

    pub(crate) fn watch_error(&self) -> watch::Receiver<Option<CoreError>> {
        self.error.subscribe()
    }

    // ── Private helpers ─────────────────────────────────────────────

    fn rebuild_snapshot(&self) {
        let order = self.read_order();
        let values: Vec<Arc<T>> = order
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|r| Arc::clone(r.value())))
            .collect();
        drop(order);
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    fn read_order(&self) -> std::sync::RwLockReadGuard<'_, Vec<i64>> {
        self.order.read().expect("order lock poisoned")
    }

    fn write_order(&self) -> std::sync::RwLockWriteGuard<'_, Vec<i64>> {
        self.order.write().expect("order lock poisoned")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        id: i64,
        label: &'static str,
    }

    impl Keyed for Row {
        fn key(&self) -> i64 {
            self.id
        }
    }

    fn row(id: i64, label: &'static str) -> Row {
        Row { id, label }
    }

    #[test]
    fn replace_all_swaps_the_snapshot_wholesale() {
        let col: ResourceCollection<Row> = ResourceCollection::new();
        col.replace_all(vec![row(1, "a"), row(2, "b")]);
        assert_eq!(col.len(), 2);

        col.replace_all(vec![row(3, "c")]);

        let snap = col.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, 3);
        assert!(col.get(1).is_none());
    }

    #[test]
    fn upsert_appends_new_and_replaces_in_place() {
        let col: ResourceCollection<Row> = ResourceCollection::new();
        col.replace_all(vec![row(1, "a"), row(2, "b")]);

        col.upsert(row(1, "a2"));
        col.upsert(row(3, "c"));

        let snap = col.snapshot();
        let ids: Vec<i64> = snap.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(col.get(1).unwrap().label, "a2");
    }

    #[test]
    fn remove_drops_record_and_order_entry() {
        let col: ResourceCollection<Row> = ResourceCollection::new();
        col.replace_all(vec![row(1, "a"), row(2, "b")]);

        let removed = col.remove(1);

        assert_eq!(removed.unwrap().label, "a");
        assert!(col.get(1).is_none());
        assert_eq!(col.snapshot().len(), 1);
        assert!(col.remove(1).is_none());
    }

    #[test]
    fn subscribers_see_mutations() {
        let col: ResourceCollection<Row> = ResourceCollection::new();
        let rx = col.subscribe();

        col.upsert(row(1, "a"));

        assert_eq!(rx.borrow().len(), 1);
    }

    #[test]
    fn error_metadata_round_trip() {
        let col: ResourceCollection<Row> = ResourceCollection::new();
        assert!(col.last_error().is_none());

        let err = CoreError::Network {
            message: "connection refused".into(),
        };
        col.record_error(&err);
        assert_eq!(col.last_error(), Some(err));

        col.clear_error();
        assert!(col.last_error().is_none());
    }

    #[test]
    fn loading_flag_round_trip() {
        let col: ResourceCollection<Row> = ResourceCollection::new();
        assert!(!col.is_loading());
        col.set_loading(true);
        assert!(col.is_loading());
        col.set_loading(false);
        assert!(!col.is_loading());
    }
}
