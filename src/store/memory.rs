//! # In-Memory Store
//!
//! Single-collection document store keyed by id. The map key doubles as
//! the unique index on `id`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use super::errors::{StoreError, StoreResult};
use super::{DatapointStore, FindQuery};
use crate::datapoint::{Datapoint, DatapointId};

/// In-memory datapoint collection
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<DatapointId, Datapoint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<DatapointId, Datapoint>>> {
        self.documents
            .read()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<DatapointId, Datapoint>>> {
        self.documents
            .write()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
    }
}

/// Newest first; id breaks ties so that pages are stable
fn newest_first(a: &Datapoint, b: &Datapoint) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

impl DatapointStore for MemoryStore {
    fn find_by_id(&self, id: &DatapointId) -> StoreResult<Option<Datapoint>> {
        Ok(self.read()?.get(id).cloned())
    }

    fn find(&self, query: &FindQuery) -> StoreResult<Vec<Datapoint>> {
        let docs = self.read()?;

        let mut matched: Vec<&Datapoint> = docs
            .values()
            .filter(|doc| query.filter.matches(doc))
            .collect();
        matched.sort_by(|a, b| newest_first(a, b));

        trace!(matched = matched.len(), skip = query.skip, limit = query.limit, "find");

        Ok(matched
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .cloned()
            .collect())
    }

    fn insert(&self, datapoint: Datapoint) -> StoreResult<()> {
        let mut docs = self.write()?;
        if docs.contains_key(&datapoint.id) {
            return Err(StoreError::duplicate_key("id", datapoint.id));
        }
        docs.insert(datapoint.id, datapoint);
        Ok(())
    }

    fn upsert(&self, datapoint: Datapoint) -> StoreResult<()> {
        self.write()?.insert(datapoint.id, datapoint);
        Ok(())
    }

    fn update(&self, datapoint: Datapoint) -> StoreResult<bool> {
        let mut docs = self.write()?;
        match docs.get_mut(&datapoint.id) {
            Some(slot) => {
                *slot = datapoint;
                Ok(true)
            }
            None => {
                trace!(id = %datapoint.id, "update missed");
                Ok(false)
            }
        }
    }

    fn delete(&self, id: &DatapointId) -> StoreResult<bool> {
        Ok(self.write()?.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapoint::{now, DatapointFields};
    use crate::store::DatapointFilter;
    use chrono::Duration;

    fn datapoint(windspeed: f64, minutes_ago: i64) -> Datapoint {
        Datapoint::new(
            DatapointId::generate(),
            &DatapointFields {
                windspeed: Some(windspeed),
                ..Default::default()
            },
            now() - Duration::minutes(minutes_ago),
        )
    }

    fn all(skip: usize, limit: usize) -> FindQuery {
        FindQuery {
            filter: DatapointFilter::default(),
            skip,
            limit,
        }
    }

    #[test]
    fn test_insert_and_find_by_id() {
        let store = MemoryStore::new();
        let dp = datapoint(4.0, 0);
        store.insert(dp.clone()).unwrap();

        assert_eq!(store.find_by_id(&dp.id).unwrap(), Some(dp));
        assert_eq!(store.find_by_id(&DatapointId::generate()).unwrap(), None);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let store = MemoryStore::new();
        let dp = datapoint(1.0, 0);
        store.insert(dp.clone()).unwrap();

        let err = store.insert(dp.clone()).unwrap_err();
        assert_eq!(err, StoreError::duplicate_key("id", dp.id));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_find_orders_newest_first() {
        let store = MemoryStore::new();
        let old = datapoint(1.0, 30);
        let mid = datapoint(2.0, 20);
        let new = datapoint(3.0, 10);
        store.insert(mid.clone()).unwrap();
        store.insert(old.clone()).unwrap();
        store.insert(new.clone()).unwrap();

        let ids: Vec<_> = store.find(&all(0, 10)).unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![new.id, mid.id, old.id]);
    }

    #[test]
    fn test_find_pages_do_not_overlap() {
        let store = MemoryStore::new();
        let at = now();
        for _ in 0..7 {
            store
                .insert(Datapoint::new(DatapointId::generate(), &DatapointFields::default(), at))
                .unwrap();
        }

        let first = store.find(&all(0, 3)).unwrap();
        let second = store.find(&all(3, 3)).unwrap();
        let third = store.find(&all(6, 3)).unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
        assert_eq!(third.len(), 1);

        let mut seen: Vec<_> = first.iter().chain(&second).chain(&third).map(|d| d.id).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_find_applies_filter() {
        let store = MemoryStore::new();
        let target = datapoint(7.5, 5);
        store.insert(target.clone()).unwrap();
        store.insert(datapoint(7.5, 6)).unwrap();
        store.insert(datapoint(2.0, 7)).unwrap();

        let by_speed = store
            .find(&FindQuery {
                filter: DatapointFilter {
                    windspeed: Some(7.5),
                    ..Default::default()
                },
                skip: 0,
                limit: 30,
            })
            .unwrap();
        assert_eq!(by_speed.len(), 2);

        let by_time = store
            .find(&FindQuery {
                filter: DatapointFilter {
                    created_at: Some(target.created_at),
                    windspeed: Some(7.5),
                },
                skip: 0,
                limit: 30,
            })
            .unwrap();
        assert_eq!(by_time, vec![target]);
    }

    #[test]
    fn test_upsert_creates_and_overwrites() {
        let store = MemoryStore::new();
        let mut dp = datapoint(1.0, 0);
        store.upsert(dp.clone()).unwrap();
        assert_eq!(store.len().unwrap(), 1);

        dp.windspeed = 9.0;
        store.upsert(dp.clone()).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.find_by_id(&dp.id).unwrap().unwrap().windspeed, 9.0);
    }

    #[test]
    fn test_update_only_touches_existing_records() {
        let store = MemoryStore::new();
        let mut dp = datapoint(1.0, 0);
        assert!(!store.update(dp.clone()).unwrap());
        assert!(store.is_empty().unwrap());

        store.insert(dp.clone()).unwrap();
        dp.humidity = 64.0;
        assert!(store.update(dp.clone()).unwrap());
        assert_eq!(store.find_by_id(&dp.id).unwrap(), Some(dp.clone()));

        store.delete(&dp.id).unwrap();
        assert!(!store.update(dp.clone()).unwrap());
        assert_eq!(store.find_by_id(&dp.id).unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let dp = datapoint(1.0, 0);
        store.insert(dp.clone()).unwrap();

        assert!(store.delete(&dp.id).unwrap());
        assert!(!store.delete(&dp.id).unwrap());
        assert!(store.is_empty().unwrap());
    }
}
