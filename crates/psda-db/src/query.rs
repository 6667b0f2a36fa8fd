//! Store-backed read operations behind the HTTP endpoints.
//!
//! Each operation checks that the resource exists (so an unknown id is a
//! not-found error, while a known id without data is an empty series), pulls
//! the raw rows and hands them to the pure functions in `psda_core`.

use crate::error::{StoreError, StoreResult};
use crate::schema::{FuelTable, SeriesTable};
use crate::store::GridStore;
use psda_core::{
    capacity_series, exports, filter_by_window, generation_series, imports,
    normalize_resource_id, transmission_capacity, CapacityPoint, Exchange, GenerationPoint,
    Observation, ResourceDetail, TimeWindow, TransmissionCapacity,
};

impl GridStore {
    /// Resource fields plus the ids of its immediate children.
    pub async fn describe_resource(&self, id: &str) -> StoreResult<ResourceDetail> {
        let id = normalize_resource_id(id);
        let resource = self
            .get_resource(&id)
            .await?
            .ok_or_else(|| StoreError::not_found(&id))?;
        let children = self.children_ids(&id).await?;
        Ok(ResourceDetail::new(resource, children))
    }

    pub async fn generation(
        &self,
        id: &str,
        window: &TimeWindow,
    ) -> StoreResult<Vec<GenerationPoint>> {
        let id = self.require_resource(id).await?;
        let rows = self.fuel_rows(FuelTable::Generation, &id).await?;
        Ok(generation_series(&id, rows, window)?)
    }

    pub async fn capacity(&self, id: &str, window: &TimeWindow) -> StoreResult<Vec<CapacityPoint>> {
        let id = self.require_resource(id).await?;
        let rows = self.fuel_rows(FuelTable::Capacity, &id).await?;
        Ok(capacity_series(&id, rows, window)?)
    }

    pub async fn demand(&self, id: &str, window: &TimeWindow) -> StoreResult<Vec<Observation>> {
        self.series(SeriesTable::Demand, id, window).await
    }

    pub async fn day_ahead_prices(
        &self,
        id: &str,
        window: &TimeWindow,
    ) -> StoreResult<Vec<Observation>> {
        self.series(SeriesTable::DayAheadPrice, id, window).await
    }

    pub async fn imports(&self, id: &str, window: &TimeWindow) -> StoreResult<Vec<Exchange>> {
        let id = self.require_resource(id).await?;
        let edges = self.exchanges_touching(&id).await?;
        Ok(imports(&id, &edges, window))
    }

    pub async fn exports(&self, id: &str, window: &TimeWindow) -> StoreResult<Vec<Exchange>> {
        let id = self.require_resource(id).await?;
        let edges = self.exchanges_touching(&id).await?;
        Ok(exports(&id, &edges, window))
    }

    /// Interconnection capacities of a resource, one entry per unit.
    pub async fn transmission_capacity(&self, id: &str) -> StoreResult<Vec<TransmissionCapacity>> {
        let id = self.require_resource(id).await?;
        let rows = self.interconnections(&id).await?;
        Ok(transmission_capacity(&id, rows))
    }

    async fn series(
        &self,
        table: SeriesTable,
        id: &str,
        window: &TimeWindow,
    ) -> StoreResult<Vec<Observation>> {
        let id = self.require_resource(id).await?;
        let rows = self.series_rows(table, &id).await?;
        Ok(filter_by_window(rows, window))
    }

    /// Normalized id of an existing resource, or not-found.
    async fn require_resource(&self, id: &str) -> StoreResult<String> {
        let id = normalize_resource_id(id);
        if self.resource_exists(&id).await? {
            Ok(id)
        } else {
            Err(StoreError::not_found(id))
        }
    }
}
