//! Shared handler state.

use psda_db::{GridStore, Seeder};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: GridStore,
    /// Seeding is triggered over HTTP through the same seeder the CLI uses.
    pub seeder: Arc<Seeder>,
}

impl AppState {
    pub fn new(seeder: Arc<Seeder>) -> Self {
        Self {
            store: seeder.store().clone(),
            seeder,
        }
    }
}
