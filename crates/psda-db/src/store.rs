//! Reference and observation store over a SQLite pool.
//!
//! Reads go through [`GridStore`] methods. Writes are free functions over a
//! `&mut SqliteConnection` so the seeder can run a whole load inside one
//! transaction.

use crate::error::StoreResult;
use crate::schema::{self, FuelTable, SeriesTable};
use chrono::{DateTime, Utc};
use psda_core::{
    Exchange, FuelObservation, FuelTechnology, FuelTypeInfo, Interconnection, Observation,
    Resource, ResourceType, TimeBucket, TopologyLevel,
};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use std::str::FromStr;
use tracing::debug;

/// How resource rows that already exist are treated on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Replace name, type and parent of existing rows
    #[default]
    Overwrite,
    /// Leave existing rows untouched
    KeepExisting,
}

/// Filters for [`GridStore::list_resources`].
#[derive(Debug, Clone)]
pub struct ResourceFilter {
    pub limit: u32,
    pub resource_type: Option<ResourceType>,
}

impl Default for ResourceFilter {
    fn default() -> Self {
        Self {
            limit: 10,
            resource_type: None,
        }
    }
}

/// Row count per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub resources: u64,
    pub fuel_types: u64,
    pub fuel_technologies: u64,
    pub topology_levels: u64,
    pub generation: u64,
    pub capacity: u64,
    pub demand: u64,
    pub day_ahead_price: u64,
    pub exchanges: u64,
    pub transmission_capacity: u64,
}

#[derive(FromRow)]
struct ResourceRow {
    id: String,
    name: String,
    #[sqlx(rename = "type")]
    resource_type: String,
    parent_id: Option<String>,
}

impl From<ResourceRow> for Resource {
    fn from(row: ResourceRow) -> Self {
        Resource {
            id: row.id,
            name: row.name,
            resource_type: ResourceType::from(row.resource_type),
            parent_id: row.parent_id,
        }
    }
}

#[derive(FromRow)]
struct FuelRow {
    resource_id: String,
    start_datetime: DateTime<Utc>,
    end_datetime: DateTime<Utc>,
    fuel_type: String,
    technology: Option<String>,
    value: f64,
    unit: String,
}

impl From<FuelRow> for FuelObservation {
    fn from(row: FuelRow) -> Self {
        FuelObservation {
            resource_id: row.resource_id,
            bucket: TimeBucket {
                start_datetime: row.start_datetime,
                end_datetime: row.end_datetime,
            },
            fuel_type: row.fuel_type,
            technology: row.technology,
            value: row.value,
            unit: row.unit,
        }
    }
}

#[derive(FromRow)]
struct SeriesRow {
    resource_id: String,
    start_datetime: DateTime<Utc>,
    end_datetime: DateTime<Utc>,
    value: f64,
    unit: String,
}

impl From<SeriesRow> for Observation {
    fn from(row: SeriesRow) -> Self {
        Observation {
            resource_id: row.resource_id,
            bucket: TimeBucket {
                start_datetime: row.start_datetime,
                end_datetime: row.end_datetime,
            },
            value: row.value,
            unit: row.unit,
        }
    }
}

#[derive(FromRow)]
struct ExchangeRow {
    resource_from_id: String,
    resource_to_id: String,
    start_datetime: DateTime<Utc>,
    end_datetime: DateTime<Utc>,
    value: f64,
    unit: String,
}

impl From<ExchangeRow> for Exchange {
    fn from(row: ExchangeRow) -> Self {
        Exchange {
            resource_from_id: row.resource_from_id,
            resource_to_id: row.resource_to_id,
            bucket: TimeBucket {
                start_datetime: row.start_datetime,
                end_datetime: row.end_datetime,
            },
            value: row.value,
            unit: row.unit,
        }
    }
}

#[derive(FromRow)]
struct InterconnectionRow {
    resource_id: String,
    connected_resource_id: String,
    value: f64,
    unit: String,
}

impl From<InterconnectionRow> for Interconnection {
    fn from(row: InterconnectionRow) -> Self {
        Interconnection {
            resource_id: row.resource_id,
            connected_resource_id: row.connected_resource_id,
            value: row.value,
            unit: row.unit,
        }
    }
}

#[derive(FromRow)]
struct TopologyLevelRow {
    id: String,
    level: i64,
}

/// Handle to the SQLite store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GridStore {
    pool: SqlitePool,
}

impl GridStore {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections.max(1));
        if url.contains(":memory:") || url.contains("mode=memory") {
            // every pooled connection to an in-memory URL is a separate database
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory database.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        schema::create_schema(&mut conn).await?;
        Ok(())
    }

    pub async fn list_resources(&self, filter: &ResourceFilter) -> StoreResult<Vec<Resource>> {
        let rows: Vec<ResourceRow> = match &filter.resource_type {
            Some(resource_type) => {
                sqlx::query_as(
                    "SELECT id, name, type, parent_id FROM resources WHERE type = ? ORDER BY id LIMIT ?",
                )
                .bind(resource_type.as_str())
                .bind(i64::from(filter.limit))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT id, name, type, parent_id FROM resources ORDER BY id LIMIT ?")
                    .bind(i64::from(filter.limit))
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows.into_iter().map(Resource::from).collect())
    }

    pub async fn get_resource(&self, id: &str) -> StoreResult<Option<Resource>> {
        let row: Option<ResourceRow> =
            sqlx::query_as("SELECT id, name, type, parent_id FROM resources WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Resource::from))
    }

    pub async fn resource_exists(&self, id: &str) -> StoreResult<bool> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM resources WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Ids of resources whose parent is `id`, sorted.
    pub async fn children_ids(&self, id: &str) -> StoreResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM resources WHERE parent_id = ? ORDER BY id")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn fuel_rows(
        &self,
        table: FuelTable,
        resource_id: &str,
    ) -> StoreResult<Vec<FuelObservation>> {
        let sql = format!(
            "SELECT resource_id, start_datetime, end_datetime, fuel_type, technology, value, unit \
             FROM {} WHERE resource_id = ? ORDER BY start_datetime, fuel_type",
            table.name()
        );
        let rows: Vec<FuelRow> = sqlx::query_as(&sql)
            .bind(resource_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(FuelObservation::from).collect())
    }

    pub async fn series_rows(
        &self,
        table: SeriesTable,
        resource_id: &str,
    ) -> StoreResult<Vec<Observation>> {
        let sql = format!(
            "SELECT resource_id, start_datetime, end_datetime, value, unit \
             FROM {} WHERE resource_id = ? ORDER BY start_datetime",
            table.name()
        );
        let rows: Vec<SeriesRow> = sqlx::query_as(&sql)
            .bind(resource_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Observation::from).collect())
    }

    /// Every exchange with `resource_id` on either end, as stored.
    pub async fn exchanges_touching(&self, resource_id: &str) -> StoreResult<Vec<Exchange>> {
        let rows: Vec<ExchangeRow> = sqlx::query_as(
            "SELECT resource_from_id, resource_to_id, start_datetime, end_datetime, value, unit \
             FROM exchanges WHERE resource_from_id = ?1 OR resource_to_id = ?1 \
             ORDER BY start_datetime",
        )
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Exchange::from).collect())
    }

    /// Interconnections declared from `resource_id`, by neighbour id.
    pub async fn interconnections(&self, resource_id: &str) -> StoreResult<Vec<Interconnection>> {
        let rows: Vec<InterconnectionRow> = sqlx::query_as(
            "SELECT resource_id, connected_resource_id, value, unit \
             FROM transmission_capacity WHERE resource_id = ? ORDER BY connected_resource_id",
        )
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Interconnection::from).collect())
    }

    pub async fn fuel_types(&self) -> StoreResult<Vec<FuelTypeInfo>> {
        let rows: Vec<(String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT name, external_id, external_reference FROM fuel_types ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(name, external_id, external_reference)| FuelTypeInfo {
                name,
                external_id,
                external_reference,
            })
            .collect())
    }

    pub async fn fuel_technologies(&self) -> StoreResult<Vec<FuelTechnology>> {
        let rows: Vec<(String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT name, fuel_type, external_id FROM fuel_technologies ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(name, fuel_type, external_id)| FuelTechnology {
                name,
                fuel_type,
                external_id,
            })
            .collect())
    }

    /// Topology levels ordered by level.
    pub async fn topology_levels(&self) -> StoreResult<Vec<TopologyLevel>> {
        let rows: Vec<TopologyLevelRow> =
            sqlx::query_as("SELECT id, level FROM topology_levels ORDER BY level, id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|row| TopologyLevel {
                id: row.id,
                level: u32::try_from(row.level).unwrap_or_default(),
            })
            .collect())
    }

    pub async fn counts(&self) -> StoreResult<TableCounts> {
        let mut counts = TableCounts::default();
        for table in schema::WIPE_ORDER {
            let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&self.pool)
                .await?;
            *counts.slot(table) = count as u64;
        }
        debug!(?counts, "table counts");
        Ok(counts)
    }
}

impl TableCounts {
    fn slot(&mut self, table: &str) -> &mut u64 {
        match table {
            "resources" => &mut self.resources,
            "fuel_types" => &mut self.fuel_types,
            "fuel_technologies" => &mut self.fuel_technologies,
            "topology_levels" => &mut self.topology_levels,
            "generation" => &mut self.generation,
            "capacity" => &mut self.capacity,
            "demand" => &mut self.demand,
            "day_ahead_price" => &mut self.day_ahead_price,
            "transmission_capacity" => &mut self.transmission_capacity,
            _ => &mut self.exchanges,
        }
    }

    pub fn observations(&self) -> u64 {
        self.generation
            + self.capacity
            + self.demand
            + self.day_ahead_price
            + self.exchanges
            + self.transmission_capacity
    }

    pub fn add(&mut self, other: &TableCounts) {
        self.resources += other.resources;
        self.fuel_types += other.fuel_types;
        self.fuel_technologies += other.fuel_technologies;
        self.topology_levels += other.topology_levels;
        self.generation += other.generation;
        self.capacity += other.capacity;
        self.demand += other.demand;
        self.day_ahead_price += other.day_ahead_price;
        self.exchanges += other.exchanges;
        self.transmission_capacity += other.transmission_capacity;
    }
}

/// Insert resources in the given order; callers pass parents first.
pub async fn upsert_resources(
    conn: &mut SqliteConnection,
    resources: &[Resource],
    mode: WriteMode,
) -> StoreResult<u64> {
    let sql = match mode {
        WriteMode::Overwrite => {
            "INSERT INTO resources (id, name, type, parent_id) VALUES (?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, type = excluded.type, \
             parent_id = excluded.parent_id"
        }
        WriteMode::KeepExisting => {
            "INSERT INTO resources (id, name, type, parent_id) VALUES (?, ?, ?, ?) \
             ON CONFLICT(id) DO NOTHING"
        }
    };
    let mut written = 0;
    for resource in resources {
        written += sqlx::query(sql)
            .bind(&resource.id)
            .bind(&resource.name)
            .bind(resource.resource_type.as_str())
            .bind(&resource.parent_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
    }
    Ok(written)
}

/// Insert fuel types. An existing row keeps its external id and reference
/// unless the new entry provides one.
pub async fn upsert_fuel_types(
    conn: &mut SqliteConnection,
    fuel_types: &[FuelTypeInfo],
) -> StoreResult<u64> {
    let mut written = 0;
    for fuel in fuel_types {
        written += sqlx::query(
            "INSERT INTO fuel_types (name, external_id, external_reference) VALUES (?, ?, ?) \
             ON CONFLICT(name) DO UPDATE SET \
             external_id = COALESCE(excluded.external_id, fuel_types.external_id), \
             external_reference = COALESCE(excluded.external_reference, fuel_types.external_reference)",
        )
        .bind(&fuel.name)
        .bind(&fuel.external_id)
        .bind(&fuel.external_reference)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    Ok(written)
}

pub async fn upsert_fuel_technologies(
    conn: &mut SqliteConnection,
    technologies: &[FuelTechnology],
) -> StoreResult<u64> {
    let mut written = 0;
    for tech in technologies {
        written += sqlx::query(
            "INSERT INTO fuel_technologies (name, fuel_type, external_id) VALUES (?, ?, ?) \
             ON CONFLICT(name) DO UPDATE SET fuel_type = excluded.fuel_type, \
             external_id = excluded.external_id",
        )
        .bind(&tech.name)
        .bind(&tech.fuel_type)
        .bind(&tech.external_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    Ok(written)
}

pub async fn upsert_topology_levels(
    conn: &mut SqliteConnection,
    levels: &[TopologyLevel],
) -> StoreResult<u64> {
    let mut written = 0;
    for level in levels {
        written += sqlx::query(
            "INSERT INTO topology_levels (id, level) VALUES (?, ?) \
             ON CONFLICT(id) DO UPDATE SET level = excluded.level",
        )
        .bind(&level.id)
        .bind(i64::from(level.level))
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    Ok(written)
}

pub async fn upsert_fuel_rows(
    conn: &mut SqliteConnection,
    table: FuelTable,
    rows: &[FuelObservation],
) -> StoreResult<u64> {
    let sql = format!(
        "INSERT INTO {} (resource_id, start_datetime, end_datetime, fuel_type, technology, value, unit) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(resource_id, start_datetime, end_datetime, fuel_type) DO UPDATE SET \
         technology = excluded.technology, value = excluded.value, unit = excluded.unit",
        table.name()
    );
    let mut written = 0;
    for row in rows {
        written += sqlx::query(&sql)
            .bind(&row.resource_id)
            .bind(row.bucket.start_datetime)
            .bind(row.bucket.end_datetime)
            .bind(&row.fuel_type)
            .bind(&row.technology)
            .bind(row.value)
            .bind(&row.unit)
            .execute(&mut *conn)
            .await?
            .rows_affected();
    }
    Ok(written)
}

pub async fn upsert_series_rows(
    conn: &mut SqliteConnection,
    table: SeriesTable,
    rows: &[Observation],
) -> StoreResult<u64> {
    let sql = format!(
        "INSERT INTO {} (resource_id, start_datetime, end_datetime, value, unit) \
         VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT(resource_id, start_datetime, end_datetime) DO UPDATE SET \
         value = excluded.value, unit = excluded.unit",
        table.name()
    );
    let mut written = 0;
    for row in rows {
        written += sqlx::query(&sql)
            .bind(&row.resource_id)
            .bind(row.bucket.start_datetime)
            .bind(row.bucket.end_datetime)
            .bind(row.value)
            .bind(&row.unit)
            .execute(&mut *conn)
            .await?
            .rows_affected();
    }
    Ok(written)
}

pub async fn upsert_exchanges(
    conn: &mut SqliteConnection,
    rows: &[Exchange],
) -> StoreResult<u64> {
    let mut written = 0;
    for row in rows {
        written += sqlx::query(
            "INSERT INTO exchanges (resource_from_id, resource_to_id, start_datetime, end_datetime, value, unit) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(resource_from_id, resource_to_id, start_datetime, end_datetime) DO UPDATE SET \
             value = excluded.value, unit = excluded.unit",
        )
        .bind(&row.resource_from_id)
        .bind(&row.resource_to_id)
        .bind(row.bucket.start_datetime)
        .bind(row.bucket.end_datetime)
        .bind(row.value)
        .bind(&row.unit)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    Ok(written)
}

pub async fn upsert_interconnections(
    conn: &mut SqliteConnection,
    rows: &[Interconnection],
) -> StoreResult<u64> {
    let mut written = 0;
    for row in rows {
        written += sqlx::query(
            "INSERT INTO transmission_capacity (resource_id, connected_resource_id, value, unit) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(resource_id, connected_resource_id) DO UPDATE SET \
             value = excluded.value, unit = excluded.unit",
        )
        .bind(&row.resource_id)
        .bind(&row.connected_resource_id)
        .bind(row.value)
        .bind(&row.unit)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn res(id: &str, resource_type: ResourceType, parent: Option<&str>) -> Resource {
        Resource {
            id: id.into(),
            name: format!("{id} name"),
            resource_type,
            parent_id: parent.map(str::to_string),
        }
    }

    fn hour(h: u32) -> TimeBucket {
        TimeBucket::new(
            Utc.with_ymd_and_hms(2021, 6, 1, h, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 6, 1, h + 1, 0, 0).unwrap(),
        )
        .unwrap()
    }

    async fn seeded() -> GridStore {
        let store = GridStore::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();
        upsert_resources(
            &mut conn,
            &[
                res("US-WECC", ResourceType::System, None),
                res("US-WECC-CISO", ResourceType::Market, Some("US-WECC")),
                res("US-WECC-BPAT", ResourceType::Market, Some("US-WECC")),
            ],
            WriteMode::Overwrite,
        )
        .await
        .unwrap();
        upsert_fuel_types(&mut conn, &[FuelTypeInfo::named(&psda_core::FuelType::Solar)])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_list_resources_respects_limit_and_type() {
        let store = seeded().await;
        let all = store
            .list_resources(&ResourceFilter {
                limit: 10,
                resource_type: None,
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "US-WECC");

        let limited = store
            .list_resources(&ResourceFilter {
                limit: 1,
                resource_type: None,
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);

        let markets = store
            .list_resources(&ResourceFilter {
                limit: 10,
                resource_type: Some(ResourceType::Market),
            })
            .await
            .unwrap();
        assert_eq!(markets.len(), 2);
        assert!(markets.iter().all(|r| r.resource_type == ResourceType::Market));
    }

    #[tokio::test]
    async fn test_children_are_reverse_lookup() {
        let store = seeded().await;
        assert_eq!(
            store.children_ids("US-WECC").await.unwrap(),
            vec!["US-WECC-BPAT".to_string(), "US-WECC-CISO".to_string()]
        );
        assert!(store.children_ids("US-WECC-CISO").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keep_existing_does_not_overwrite() {
        let store = seeded().await;
        let mut conn = store.pool().acquire().await.unwrap();
        let mut renamed = res("US-WECC", ResourceType::System, None);
        renamed.name = "Renamed".into();
        upsert_resources(&mut conn, &[renamed.clone()], WriteMode::KeepExisting)
            .await
            .unwrap();
        drop(conn);
        let stored = store.get_resource("US-WECC").await.unwrap().unwrap();
        assert_eq!(stored.name, "US-WECC name");

        let mut conn = store.pool().acquire().await.unwrap();
        upsert_resources(&mut conn, &[renamed], WriteMode::Overwrite)
            .await
            .unwrap();
        drop(conn);
        let stored = store.get_resource("US-WECC").await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
    }

    #[tokio::test]
    async fn test_observation_upsert_is_last_write_wins() {
        let store = seeded().await;
        let mut conn = store.pool().acquire().await.unwrap();
        let mut row = FuelObservation {
            resource_id: "US-WECC-CISO".into(),
            bucket: hour(0),
            fuel_type: "solar".into(),
            technology: None,
            value: 100.0,
            unit: "MWh".into(),
        };
        upsert_fuel_rows(&mut conn, FuelTable::Generation, &[row.clone()])
            .await
            .unwrap();
        row.value = 110.0;
        upsert_fuel_rows(&mut conn, FuelTable::Generation, &[row])
            .await
            .unwrap();
        drop(conn);

        let rows = store
            .fuel_rows(FuelTable::Generation, "US-WECC-CISO")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 110.0);
        assert_eq!(rows[0].bucket, hour(0));
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let store = seeded().await;
        let mut conn = store.pool().acquire().await.unwrap();
        let orphan = Observation {
            resource_id: "NOPE".into(),
            bucket: hour(0),
            value: 1.0,
            unit: "MW".into(),
        };
        let err = upsert_series_rows(&mut conn, SeriesTable::Demand, &[orphan])
            .await
            .unwrap_err();
        assert!(matches!(err, crate::StoreError::Database(_)));
    }

    #[tokio::test]
    async fn test_exchanges_touching_either_end() {
        let store = seeded().await;
        let mut conn = store.pool().acquire().await.unwrap();
        upsert_exchanges(
            &mut conn,
            &[Exchange {
                resource_from_id: "US-WECC-BPAT".into(),
                resource_to_id: "US-WECC-CISO".into(),
                bucket: hour(0),
                value: 120.0,
                unit: "MWh".into(),
            }],
        )
        .await
        .unwrap();
        drop(conn);
        assert_eq!(store.exchanges_touching("US-WECC-CISO").await.unwrap().len(), 1);
        assert_eq!(store.exchanges_touching("US-WECC-BPAT").await.unwrap().len(), 1);
        assert!(store.exchanges_touching("US-WECC").await.unwrap().is_empty());

        let counts = store.counts().await.unwrap();
        assert_eq!(counts.resources, 3);
        assert_eq!(counts.exchanges, 1);
        assert_eq!(counts.observations(), 1);
    }

    #[tokio::test]
    async fn test_interconnections_are_directional() {
        let store = seeded().await;
        let mut conn = store.pool().acquire().await.unwrap();
        let link = Interconnection {
            resource_id: "US-WECC-CISO".into(),
            connected_resource_id: "US-WECC-BPAT".into(),
            value: 4800.0,
            unit: "MW".into(),
        };
        upsert_interconnections(&mut conn, &[link.clone()]).await.unwrap();
        let updated = Interconnection {
            value: 5000.0,
            ..link
        };
        upsert_interconnections(&mut conn, &[updated]).await.unwrap();
        drop(conn);

        let rows = store.interconnections("US-WECC-CISO").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 5000.0);
        assert!(store.interconnections("US-WECC-BPAT").await.unwrap().is_empty());
        assert_eq!(store.counts().await.unwrap().transmission_capacity, 1);
    }

    #[tokio::test]
    async fn test_fuel_type_upsert_keeps_existing_external_id() {
        let store = seeded().await;
        let mut conn = store.pool().acquire().await.unwrap();
        upsert_fuel_types(
            &mut conn,
            &[FuelTypeInfo {
                name: "solar".into(),
                external_id: Some("T010000".into()),
                external_reference: None,
            }],
        )
        .await
        .unwrap();
        upsert_fuel_types(&mut conn, &[FuelTypeInfo::named(&psda_core::FuelType::Solar)])
            .await
            .unwrap();
        drop(conn);
        let fuels = store.fuel_types().await.unwrap();
        assert_eq!(fuels.len(), 1);
        assert_eq!(fuels[0].external_id.as_deref(), Some("T010000"));
    }
}
