//! Vehicle population and kinematics
//!
//! Owns the set of currently active vehicles, spawns and retires them to
//! track a time-varying target population, and advances each vehicle's
//! position every tick.

use chrono::{Duration, Timelike, Utc};
use std::collections::HashMap;

use super::city::{generate_vehicle_id, random_junction_position, random_owner_name};
use super::intensity::traffic_intensity;
use super::rng::EngineRng;
use super::types::{Vehicle, VehicleCategory, VehicleStatus};

/// Target active population at full intensity.
pub const TARGET_POPULATION_SCALE: f64 = 500.0;

/// Spawn cap per rebalance tick, so the population grows smoothly.
pub const MAX_SPAWNS_PER_TICK: usize = 10;

/// Retirement cap per rebalance tick; this also bounds in-memory shrink churn.
pub const MAX_RETIREMENTS_PER_TICK: usize = 5;

/// Speed ceiling for any vehicle, km/h.
pub const MAX_SPEED_KMH: f64 = 80.0;

// Simplified equirectangular projection
const KM_PER_DEGREE: f64 = 111.0;

/// Manager of the live vehicle population.
///
/// The map of active vehicles is owned exclusively by this component; other
/// generators reference vehicles via the external source snapshot instead.
pub struct VehiclePopulationManager {
    vehicles: HashMap<String, Vehicle>,
    rng: EngineRng,
}

impl VehiclePopulationManager {
    pub fn new(rng: EngineRng) -> Self {
        Self {
            vehicles: HashMap::new(),
            rng,
        }
    }

    /// Create a manager pre-populated with `count` vehicles.
    pub fn with_initial_population(rng: EngineRng, count: usize) -> Self {
        let mut manager = Self::new(rng);
        for _ in 0..count {
            manager.spawn_vehicle();
        }
        manager
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Ids of all currently active vehicles.
    pub fn active_ids(&self) -> Vec<String> {
        self.vehicles.keys().cloned().collect()
    }

    /// Spawn a fresh vehicle near a random junction and add it to the
    /// active population. Id collisions are statistically negligible and
    /// not enforced against.
    pub fn spawn_vehicle(&mut self) -> Vehicle {
        let vehicle_id = generate_vehicle_id(&mut self.rng);
        let (lat, lng, location) = random_junction_position(&mut self.rng);
        let category = *self.rng.weighted(&VehicleCategory::WEIGHTED);

        let vehicle = Vehicle {
            vehicle_id: vehicle_id.clone(),
            owner_name: random_owner_name(&mut self.rng),
            vehicle_type: category,
            trust_score: self.rng.int_range(70..=100),
            lat,
            lng,
            speed: self.rng.int_range(0..=80) as f64,
            heading: self.rng.int_range(0..=359),
            location: location.to_string(),
            timestamp: Utc::now(),
            status: VehicleStatus::Active,
        };

        self.vehicles.insert(vehicle_id, vehicle.clone());
        vehicle
    }

    /// Spawn or retire vehicles toward the target count, bounded per tick so
    /// the population never jumps discontinuously.
    pub fn rebalance(&mut self, target: usize) {
        let current = self.vehicles.len();

        if current < target {
            let to_spawn = (target - current).min(MAX_SPAWNS_PER_TICK);
            for _ in 0..to_spawn {
                self.spawn_vehicle();
            }
        } else if current > target {
            let to_retire = (current - target).min(MAX_RETIREMENTS_PER_TICK);
            let mut ids: Vec<String> = self.vehicles.keys().cloned().collect();
            for _ in 0..to_retire {
                if ids.is_empty() {
                    break;
                }
                let id = ids.swap_remove(self.rng.index(ids.len()));
                self.vehicles.remove(&id);
            }
        }
    }

    /// Target population for the current intensity.
    pub fn target_for_intensity(intensity: f64) -> usize {
        (TARGET_POPULATION_SCALE * intensity).round() as usize
    }

    /// Advance every active vehicle by one tick of `interval_secs` and
    /// return the updated snapshots as a batch.
    pub fn advance_tick(&mut self, interval_secs: f64) -> Vec<Vehicle> {
        let now = Utc::now();
        let interval_hours = interval_secs / 3600.0;
        let mut batch = Vec::with_capacity(self.vehicles.len());

        for vehicle in self.vehicles.values_mut() {
            let distance_deg = vehicle.speed / KM_PER_DEGREE * interval_hours;
            let heading_rad = (vehicle.heading as f64).to_radians();
            vehicle.lat += distance_deg * heading_rad.cos();
            vehicle.lng += distance_deg * heading_rad.sin();
            vehicle.timestamp = now;

            // Occasionally drift heading and speed
            if self.rng.chance(0.2) {
                vehicle.heading =
                    (vehicle.heading + self.rng.int_range(-30..=30)).rem_euclid(360);
                vehicle.speed = (vehicle.speed + self.rng.int_range(-10..=10) as f64)
                    .clamp(0.0, MAX_SPEED_KMH);
            }

            batch.push(vehicle.clone());
        }

        batch
    }

    /// Generate `count` vehicle snapshots spread across the trailing 24
    /// hours, drawn from a bounded pool of unique ids. Records land more
    /// densely in busy hours: a per-record coin flip against that hour's
    /// intensity drops quiet-hour records.
    pub fn historical_batch(&mut self, count: usize) -> Vec<Vehicle> {
        let now = Utc::now();

        let pool_size = (count / 10).clamp(1, 1000);
        let id_pool: Vec<String> = (0..pool_size)
            .map(|_| generate_vehicle_id(&mut self.rng))
            .collect();

        let mut records = Vec::new();
        for _ in 0..count {
            let hours_ago = self.rng.f64_range(0.0..24.0);
            let timestamp = now - Duration::milliseconds((hours_ago * 3_600_000.0) as i64);
            let hour = timestamp.hour();

            let intensity = traffic_intensity(&mut self.rng, hour);
            if self.rng.f64_range(0.0..1.0) > intensity {
                continue;
            }

            let vehicle_id = id_pool[self.rng.index(id_pool.len())].clone();
            let (lat, lng, location) = random_junction_position(&mut self.rng);
            let category = *self.rng.weighted(&VehicleCategory::WEIGHTED);

            let speed_factor = match hour {
                23 | 0..=4 => 1.2,
                7..=9 | 17..=19 => 0.7,
                _ => 1.0,
            };
            let speed = category.base_speed_kmh() * speed_factor * self.rng.f64_range(0.8..1.2);

            records.push(Vehicle {
                vehicle_id,
                owner_name: random_owner_name(&mut self.rng),
                vehicle_type: category,
                trust_score: self.rng.int_range(60..=100),
                lat,
                lng,
                speed: (speed * 10.0).round() / 10.0,
                heading: self.rng.int_range(0..=359),
                location: location.to_string(),
                timestamp,
                status: VehicleStatus::Active,
            });
        }

        records
    }
}
