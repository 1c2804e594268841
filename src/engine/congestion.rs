//! Zone congestion field
//!
//! Computes a congestion level per fixed zone per tick from the intensity
//! signal, gaussian noise, and zone-profile peak boosts. Zones are
//! independent; there is no smoothing between neighbors.

use chrono::{DateTime, Duration, Timelike, Utc};

use super::city::{Zone, ZoneProfile, TRAFFIC_ZONES};
use super::intensity::traffic_intensity;
use super::rng::EngineRng;
use super::types::CongestionRecord;

/// Resolution of the historical backfill, minutes.
const HISTORY_STEP_MINUTES: i64 = 5;

pub struct CongestionFieldModel {
    rng: EngineRng,
}

impl CongestionFieldModel {
    pub fn new(rng: EngineRng) -> Self {
        Self { rng }
    }

    /// Compute the congestion level for one zone at the given hour.
    pub fn level_for(&mut self, zone: &Zone, hour: u32) -> i64 {
        let base = traffic_intensity(&mut self.rng, hour) * 100.0;
        let noise = self.rng.normal(0.0, 10.0);
        let level = ((base + noise) as i64).clamp(0, 100);

        let boost = match zone.profile {
            ZoneProfile::ItCorridor if (17..20).contains(&hour) => self.rng.int_range(10..=20),
            ZoneProfile::ResidentialHills if (7..10).contains(&hour) => {
                self.rng.int_range(10..=15)
            }
            ZoneProfile::HighwayInterchange
                if (7..10).contains(&hour) || (17..20).contains(&hour) =>
            {
                self.rng.int_range(15..=25)
            }
            _ => 0,
        };

        (level + boost).min(100)
    }

    /// One record per zone for the current tick.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<CongestionRecord> {
        let hour = now.hour();
        TRAFFIC_ZONES
            .iter()
            .map(|zone| {
                let congestion_level = self.level_for(zone, hour);
                CongestionRecord {
                    zone_name: zone.name.to_string(),
                    lat: zone.lat,
                    lng: zone.lng,
                    congestion_level,
                    updated_at: now,
                }
            })
            .collect()
    }

    /// Backfill the trailing 24 hours per zone at 5-minute resolution,
    /// applying the identical per-tick formula.
    pub fn historical_batch(&mut self, now: DateTime<Utc>) -> Vec<CongestionRecord> {
        let mut records = Vec::new();

        for zone in &TRAFFIC_ZONES {
            let mut minutes_ago = 0i64;
            while minutes_ago < 24 * 60 {
                let timestamp = now - Duration::minutes(minutes_ago);
                let congestion_level = self.level_for(zone, timestamp.hour());
                records.push(CongestionRecord {
                    zone_name: zone.name.to_string(),
                    lat: zone.lat,
                    lng: zone.lng,
                    congestion_level,
                    updated_at: timestamp,
                });
                minutes_ago += HISTORY_STEP_MINUTES;
            }
        }

        records
    }
}
