//! In-process sink and source implementations
//!
//! Used by the test suite and by `--dry-run`, where batches are collected in
//! memory instead of being shipped anywhere.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{KnownVehicle, RecordSink, VehicleSource};

/// Collects every submitted batch, keyed by table name.
#[derive(Default)]
pub struct MemorySink {
    batches: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows submitted for a table so far.
    pub fn records(&self, table: &str) -> Vec<Value> {
        self.batches
            .lock()
            .map(|tables| tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Row counts per table.
    pub fn table_counts(&self) -> HashMap<String, usize> {
        self.batches
            .lock()
            .map(|tables| {
                tables
                    .iter()
                    .map(|(name, records)| (name.clone(), records.len()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn insert_batch(&self, table: &str, records: Vec<Value>) -> Result<bool> {
        if records.is_empty() {
            return Ok(false);
        }
        let mut tables = self
            .batches
            .lock()
            .map_err(|_| anyhow::anyhow!("memory sink lock poisoned"))?;
        tables.entry(table.to_string()).or_default().extend(records);
        Ok(true)
    }
}

/// Serves a fixed vehicle snapshot.
#[derive(Default)]
pub struct StaticVehicleSource {
    vehicles: Vec<KnownVehicle>,
}

impl StaticVehicleSource {
    /// A source that always returns an empty snapshot, exercising the
    /// synthesized-placeholder fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(vehicles: Vec<KnownVehicle>) -> Self {
        Self { vehicles }
    }

    pub fn from_ids(ids: &[&str]) -> Self {
        Self::new(
            ids.iter()
                .map(|id| KnownVehicle {
                    vehicle_id: id.to_string(),
                    trust_score: None,
                })
                .collect(),
        )
    }
}

#[async_trait]
impl VehicleSource for StaticVehicleSource {
    async fn fetch_known_vehicles(&self, limit: usize) -> Result<Vec<KnownVehicle>> {
        Ok(self.vehicles.iter().take(limit).cloned().collect())
    }
}
