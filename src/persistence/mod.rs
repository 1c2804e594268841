//! Persistence sink and vehicle source contracts
//!
//! The engine only needs a sink that accepts a named batch of JSON rows and
//! a source that returns a snapshot of known vehicle ids and trust scores.
//! [`rest`] provides the REST-backed production implementation; [`memory`]
//! provides in-process implementations for tests and dry runs.

pub mod memory;
pub mod rest;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Table names produced by the engine.
pub mod tables {
    pub const VEHICLES: &str = "vehicles";
    pub const ZONES_CONGESTION: &str = "zones_congestion";
    pub const ANOMALIES: &str = "anomalies";
    pub const TRUST_LEDGER: &str = "trust_ledger";

    pub const ALL: [&str; 4] = [VEHICLES, ZONES_CONGESTION, ANOMALIES, TRUST_LEDGER];
}

/// One row of the known-vehicle snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct KnownVehicle {
    pub vehicle_id: String,
    #[serde(default)]
    pub trust_score: Option<i64>,
}

/// Accepts named batches of records. Implementations may chunk internally
/// and must be safe under concurrent submissions from multiple tasks.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Insert a batch into the named table. Returns `Ok(true)` when at
    /// least part of the batch was accepted (best-effort persistence).
    async fn insert_batch(&self, table: &str, records: Vec<Value>) -> Result<bool>;
}

/// Returns a snapshot of currently known vehicles. May legitimately return
/// an empty result; callers fall back to synthesized placeholders.
#[async_trait]
pub trait VehicleSource: Send + Sync {
    async fn fetch_known_vehicles(&self, limit: usize) -> Result<Vec<KnownVehicle>>;
}

/// Serialize a record batch into the JSON rows handed to a sink.
pub fn rows<T: Serialize>(records: &[T]) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|record| serde_json::to_value(record).map_err(Into::into))
        .collect()
}
