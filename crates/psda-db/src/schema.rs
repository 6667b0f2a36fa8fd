//! SQLite schema.
//!
//! Timestamps are stored as text by sqlx's chrono codec and always written
//! from `DateTime<Utc>`, so equal instants compare equal as primary key parts.

use sqlx::SqliteConnection;

/// Observation tables keyed by (resource, bucket, fuel type).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelTable {
    Generation,
    Capacity,
}

impl FuelTable {
    pub fn name(self) -> &'static str {
        match self {
            FuelTable::Generation => "generation",
            FuelTable::Capacity => "capacity",
        }
    }
}

/// Observation tables keyed by (resource, bucket).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesTable {
    Demand,
    DayAheadPrice,
}

impl SeriesTable {
    pub fn name(self) -> &'static str {
        match self {
            SeriesTable::Demand => "demand",
            SeriesTable::DayAheadPrice => "day_ahead_price",
        }
    }
}

const CREATE_STATEMENTS: [&str; 13] = [
    "CREATE TABLE IF NOT EXISTS resources (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL,
        parent_id TEXT REFERENCES resources(id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_resources_parent ON resources(parent_id)",
    "CREATE TABLE IF NOT EXISTS fuel_types (
        name TEXT PRIMARY KEY NOT NULL,
        external_id TEXT,
        external_reference TEXT
    )",
    "CREATE TABLE IF NOT EXISTS fuel_technologies (
        name TEXT PRIMARY KEY NOT NULL,
        fuel_type TEXT,
        external_id TEXT
    )",
    "CREATE TABLE IF NOT EXISTS topology_levels (
        id TEXT PRIMARY KEY NOT NULL,
        level INTEGER NOT NULL CHECK (level >= 0)
    )",
    "CREATE TABLE IF NOT EXISTS generation (
        resource_id TEXT NOT NULL REFERENCES resources(id),
        start_datetime TEXT NOT NULL,
        end_datetime TEXT NOT NULL,
        fuel_type TEXT NOT NULL REFERENCES fuel_types(name),
        technology TEXT,
        value REAL NOT NULL,
        unit TEXT NOT NULL,
        PRIMARY KEY (resource_id, start_datetime, end_datetime, fuel_type)
    )",
    "CREATE TABLE IF NOT EXISTS capacity (
        resource_id TEXT NOT NULL REFERENCES resources(id),
        start_datetime TEXT NOT NULL,
        end_datetime TEXT NOT NULL,
        fuel_type TEXT NOT NULL REFERENCES fuel_types(name),
        technology TEXT,
        value REAL NOT NULL,
        unit TEXT NOT NULL,
        PRIMARY KEY (resource_id, start_datetime, end_datetime, fuel_type)
    )",
    "CREATE TABLE IF NOT EXISTS demand (
        resource_id TEXT NOT NULL REFERENCES resources(id),
        start_datetime TEXT NOT NULL,
        end_datetime TEXT NOT NULL,
        value REAL NOT NULL,
        unit TEXT NOT NULL,
        PRIMARY KEY (resource_id, start_datetime, end_datetime)
    )",
    "CREATE TABLE IF NOT EXISTS day_ahead_price (
        resource_id TEXT NOT NULL REFERENCES resources(id),
        start_datetime TEXT NOT NULL,
        end_datetime TEXT NOT NULL,
        value REAL NOT NULL,
        unit TEXT NOT NULL,
        PRIMARY KEY (resource_id, start_datetime, end_datetime)
    )",
    "CREATE TABLE IF NOT EXISTS exchanges (
        resource_from_id TEXT NOT NULL REFERENCES resources(id),
        resource_to_id TEXT NOT NULL REFERENCES resources(id),
        start_datetime TEXT NOT NULL,
        end_datetime TEXT NOT NULL,
        value REAL NOT NULL,
        unit TEXT NOT NULL,
        PRIMARY KEY (resource_from_id, resource_to_id, start_datetime, end_datetime)
    )",
    "CREATE INDEX IF NOT EXISTS idx_exchanges_from ON exchanges(resource_from_id)",
    "CREATE INDEX IF NOT EXISTS idx_exchanges_to ON exchanges(resource_to_id)",
    "CREATE TABLE IF NOT EXISTS transmission_capacity (
        resource_id TEXT NOT NULL REFERENCES resources(id),
        connected_resource_id TEXT NOT NULL REFERENCES resources(id),
        value REAL NOT NULL,
        unit TEXT NOT NULL,
        PRIMARY KEY (resource_id, connected_resource_id)
    )",
];

/// Child tables first, so deleting in this order never violates a foreign key.
pub(crate) const WIPE_ORDER: [&str; 10] = [
    "generation",
    "capacity",
    "demand",
    "day_ahead_price",
    "exchanges",
    "transmission_capacity",
    "fuel_technologies",
    "fuel_types",
    "topology_levels",
    "resources",
];

pub async fn create_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for statement in CREATE_STATEMENTS {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

pub async fn wipe(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for table in WIPE_ORDER {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
