//! # Datapoint Repository
//!
//! Lifecycle operations over the store. Each operation issues a single
//! store call (replace issues a write and then a read-back) and is
//! attempted once.

use std::sync::Arc;

use tracing::debug;

use super::errors::{DatapointError, DatapointResult};
use super::id::DatapointId;
use super::model::{now, Datapoint, DatapointFields};
use super::validation::ListQuery;
use crate::store::DatapointStore;

/// Datapoint operations backed by a [`DatapointStore`]
#[derive(Clone)]
pub struct DatapointRepository {
    store: Arc<dyn DatapointStore>,
}

impl DatapointRepository {
    pub fn new(store: Arc<dyn DatapointStore>) -> Self {
        Self { store }
    }

    /// Resolve a raw id. Malformed and unknown ids are both `NotFound`.
    pub fn get(&self, raw_id: &str) -> DatapointResult<Datapoint> {
        let id = DatapointId::parse(raw_id).map_err(|_| DatapointError::NotFound)?;
        self.find(&id)
    }

    /// Resolve a parsed id
    pub fn find(&self, id: &DatapointId) -> DatapointResult<Datapoint> {
        self.store.find_by_id(id)?.ok_or(DatapointError::NotFound)
    }

    /// One page of records, newest first
    pub fn list(&self, query: &ListQuery) -> DatapointResult<Vec<Datapoint>> {
        let records = self.store.find(&query.to_find_query())?;
        debug!(
            page = query.page,
            per_page = query.per_page,
            returned = records.len(),
            "listed datapoints"
        );
        Ok(records)
    }

    /// Persist a new record built from defaults plus `fields`
    pub fn create(&self, fields: &DatapointFields) -> DatapointResult<Datapoint> {
        let datapoint = Datapoint::new(DatapointId::generate(), fields, now());
        self.store
            .insert(datapoint.clone())
            .map_err(DatapointError::check_duplicate_key)?;
        debug!(id = %datapoint.id, "created datapoint");
        Ok(datapoint)
    }

    /// Reset every data field to defaults plus `fields`, keeping id and
    /// creation time, then return the stored value.
    pub fn replace(
        &self,
        existing: &Datapoint,
        fields: &DatapointFields,
    ) -> DatapointResult<Datapoint> {
        let mut replacement = Datapoint::new(existing.id, fields, existing.created_at);
        replacement.updated_at = now();

        self.store
            .upsert(replacement)
            .map_err(DatapointError::check_duplicate_key)?;
        debug!(id = %existing.id, "replaced datapoint");

        self.find(&existing.id)
    }

    /// Merge `fields` over the existing record and persist it.
    ///
    /// Never recreates a record deleted since it was loaded.
    pub fn update(
        &self,
        mut existing: Datapoint,
        fields: &DatapointFields,
    ) -> DatapointResult<Datapoint> {
        existing.apply(fields);
        existing.updated_at = now();

        let written = self
            .store
            .update(existing.clone())
            .map_err(DatapointError::check_duplicate_key)?;
        if !written {
            return Err(DatapointError::NotFound);
        }
        debug!(id = %existing.id, "updated datapoint");
        Ok(existing)
    }

    /// Delete the record
    pub fn remove(&self, existing: &Datapoint) -> DatapointResult<()> {
        if !self.store.delete(&existing.id)? {
            return Err(DatapointError::NotFound);
        }
        debug!(id = %existing.id, "removed datapoint");
        Ok(())
    }
}
