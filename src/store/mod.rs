//! # Datapoint Store
//!
//! Document-store seam for the datapoint collection.
//!
//! Each trait method is one single-document read or write (or one
//! filtered scan for `find`). Atomicity of each call is the store's
//! responsibility; callers never compose multi-step transactions.

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};

use crate::datapoint::{Datapoint, DatapointId};

/// Persistence operations over the datapoint collection
pub trait DatapointStore: Send + Sync {
    /// Fetch one record by id
    fn find_by_id(&self, id: &DatapointId) -> StoreResult<Option<Datapoint>>;

    /// Records matching `query.filter`, newest `created_at` first,
    /// then `query.skip` / `query.limit` applied
    fn find(&self, query: &FindQuery) -> StoreResult<Vec<Datapoint>>;

    /// Insert a new record; fails with `DuplicateKey` if the id is taken
    fn insert(&self, datapoint: Datapoint) -> StoreResult<()>;

    /// Overwrite the record with the same id, creating it if absent
    fn upsert(&self, datapoint: Datapoint) -> StoreResult<()>;

    /// Overwrite an existing record; `false` if the id is not present
    fn update(&self, datapoint: Datapoint) -> StoreResult<bool>;

    /// Delete by id; `false` if nothing was there
    fn delete(&self, id: &DatapointId) -> StoreResult<bool>;
}

/// Exact-match filter; `None` fields do not constrain the result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatapointFilter {
    pub created_at: Option<DateTime<Utc>>,
    pub windspeed: Option<f64>,
}

impl DatapointFilter {
    pub fn matches(&self, datapoint: &Datapoint) -> bool {
        self.created_at.map_or(true, |t| datapoint.created_at == t)
            && self.windspeed.map_or(true, |w| datapoint.windspeed == w)
    }
}

/// A filtered, offset-paginated scan
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub filter: DatapointFilter,
    pub skip: usize,
    pub limit: usize,
}
