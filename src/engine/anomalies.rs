//! Anomaly event process
//!
//! Emits a variable-rate stream of categorized security/safety events
//! referencing known vehicles. The rate follows the traffic intensity
//! signal; vehicle identity comes from the externally supplied snapshot,
//! which may lag the live population (accepted staleness).

use chrono::{DateTime, Duration, Timelike, Utc};
use uuid::Uuid;

use super::city::fallback_vehicle_id;
use super::intensity::traffic_intensity;
use super::rng::EngineRng;
use super::types::{AnomalyEvent, AnomalyStatus, AnomalyType, Severity};

/// Share of historical events already marked resolved.
const HISTORICAL_RESOLVED_RATIO: f64 = 0.7;

pub struct AnomalyEventProcess {
    rng: EngineRng,
}

impl AnomalyEventProcess {
    pub fn new(rng: EngineRng) -> Self {
        Self { rng }
    }

    /// Generate this tick's events. Count scales with intensity but never
    /// drops below one. New live events always start out Detected.
    pub fn tick(&mut self, now: DateTime<Utc>, known_vehicles: &[String]) -> Vec<AnomalyEvent> {
        let intensity = traffic_intensity(&mut self.rng, now.hour());
        let count = ((self.rng.int_range(2..=5) as f64 * intensity).round() as usize).max(1);

        (0..count)
            .map(|_| self.build_event(now, known_vehicles, AnomalyStatus::Detected))
            .collect()
    }

    /// Generate up to `count` events spread across the trailing 24 hours.
    ///
    /// Low-intensity hours are skipped probabilistically, with every third
    /// index kept regardless as a density floor. Roughly 70% of the events
    /// come out Resolved.
    pub fn historical_batch(
        &mut self,
        count: usize,
        now: DateTime<Utc>,
        known_vehicles: &[String],
    ) -> Vec<AnomalyEvent> {
        let mut events = Vec::new();

        for i in 0..count {
            let hours_ago = self.rng.f64_range(0.0..24.0);
            let timestamp = now - Duration::minutes((hours_ago * 60.0) as i64);

            let intensity = traffic_intensity(&mut self.rng, timestamp.hour());
            if self.rng.f64_range(0.0..1.0) > intensity * 1.5 && i % 3 != 0 {
                continue;
            }

            let status = if self.rng.chance(HISTORICAL_RESOLVED_RATIO) {
                AnomalyStatus::Resolved
            } else {
                AnomalyStatus::Detected
            };

            events.push(self.build_event(timestamp, known_vehicles, status));
        }

        events
    }

    fn build_event(
        &mut self,
        timestamp: DateTime<Utc>,
        known_vehicles: &[String],
        status: AnomalyStatus,
    ) -> AnomalyEvent {
        let anomaly_type = *self.rng.weighted(&AnomalyType::WEIGHTED);
        let severity = *self.rng.weighted(&Severity::WEIGHTED);
        let vehicle_id = self.pick_vehicle(known_vehicles);
        let message = self.message_for(anomaly_type, &vehicle_id);

        AnomalyEvent {
            id: Uuid::new_v4().to_string(),
            timestamp,
            vehicle_id,
            anomaly_type,
            severity,
            message,
            status,
        }
    }

    /// A vehicle from the snapshot, or a synthesized placeholder when the
    /// snapshot is empty. The fallback is expected behavior, not a failure.
    fn pick_vehicle(&mut self, known_vehicles: &[String]) -> String {
        match self.rng.choose(known_vehicles) {
            Some(id) => id.clone(),
            None => fallback_vehicle_id(&mut self.rng),
        }
    }

    /// Pick a message from the per-type template pool.
    fn message_for(&mut self, anomaly_type: AnomalyType, vehicle_id: &str) -> String {
        let templates: [String; 3] = match anomaly_type {
            AnomalyType::Overspeed => [
                format!("Vehicle {vehicle_id} detected at excess speed"),
                format!("Speed limit violation detected for {vehicle_id}"),
                format!("High speed alert for {vehicle_id}"),
            ],
            AnomalyType::EmergencyBraking => [
                format!("Hard braking event detected for {vehicle_id}"),
                format!("Emergency stop by {vehicle_id}"),
                format!("Sudden deceleration alert for {vehicle_id}"),
            ],
            AnomalyType::RsuOffline => [
                format!("Lost connection with RSU near {vehicle_id}"),
                format!("RSU communication failure in {vehicle_id} zone"),
                "RSU offline alert in traffic zone".to_string(),
            ],
            AnomalyType::SignalTampering => [
                format!("Suspicious signal activity detected from {vehicle_id}"),
                format!("Possible tampering attempt by {vehicle_id}"),
                format!("Signal integrity violation for {vehicle_id}"),
            ],
            AnomalyType::GpsSpoofing => [
                format!("GPS position mismatch detected for {vehicle_id}"),
                format!("Location spoofing attempt by {vehicle_id}"),
                format!("Suspicious location data from {vehicle_id}"),
            ],
            AnomalyType::UnauthorizedAccess => [
                format!("Security breach attempt on {vehicle_id}"),
                format!("Unauthorized control signal for {vehicle_id}"),
                format!("Access violation detected for {vehicle_id}"),
            ],
            AnomalyType::SoftwareMalfunction => [
                format!("Software error reported by {vehicle_id}"),
                format!("System malfunction in {vehicle_id}"),
                format!("Diagnostic error code from {vehicle_id}"),
            ],
        };

        let index = self.rng.index(templates.len());
        templates.into_iter().nth(index).unwrap_or_default()
    }
}
