//! Traffic Dataset Generation Library
//!
//! Synthesizes a plausible 24-hour traffic-monitoring dataset for a city and
//! continuously advances it in near-real time. Four stochastic models (vehicle
//! population, zone congestion, anomaly events, trust ledger) share a
//! time-of-day intensity signal and emit timestamped record batches to a
//! pluggable persistence sink.

pub mod engine;
pub mod persistence;
