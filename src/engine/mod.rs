//! Core simulation engine
//!
//! This module contains the four coupled stochastic models and the scheduler
//! that runs them as independent periodic tasks. The engine has no knowledge
//! of HTTP or storage details; it only talks to the sink and source traits in
//! [`crate::persistence`].

mod anomalies;
mod city;
mod congestion;
mod error;
mod intensity;
mod rng;
mod scheduler;
mod trust;
mod types;
mod vehicles;

pub use anomalies::AnomalyEventProcess;
pub use city::{
    fallback_vehicle_id, generate_vehicle_id, random_junction_position, random_owner_name,
    Junction, Zone, ZoneProfile, KEY_JUNCTIONS, TRAFFIC_ZONES,
};
pub use congestion::CongestionFieldModel;
pub use error::TickError;
pub use intensity::{traffic_intensity, trust_activity_factor};
pub use rng::EngineRng;
pub use scheduler::{HistoricalCounts, SchedulerConfig, SchedulerHandle, SimulationScheduler};
pub use trust::TrustLedger;
pub use types::{
    AnomalyEvent, AnomalyStatus, AnomalyType, CongestionRecord, Severity, TrustAction,
    TrustLedgerEntry, Vehicle, VehicleCategory, VehicleStatus,
};
pub use vehicles::{
    VehiclePopulationManager, MAX_RETIREMENTS_PER_TICK, MAX_SPAWNS_PER_TICK, MAX_SPEED_KMH,
    TARGET_POPULATION_SCALE,
};
