//! Trust/stake ledger
//!
//! Appends immutable trust-action entries per vehicle and maintains the
//! current score per vehicle as folded state. The in-memory score map is a
//! cache seeded from the external snapshot; the persisted ledger of entries
//! is authoritative.

use chrono::{DateTime, Duration, Timelike, Utc};
use std::collections::HashMap;

use super::city::fallback_vehicle_id;
use super::intensity::trust_activity_factor;
use super::rng::EngineRng;
use super::types::{TrustAction, TrustLedgerEntry};

const TRUST_SCORE_STEPS: [i64; 8] = [-5, -3, -2, -1, 1, 2, 3, 5];

pub struct TrustLedger {
    scores: HashMap<String, i64>,
    rng: EngineRng,
}

impl TrustLedger {
    pub fn new(rng: EngineRng) -> Self {
        Self {
            scores: HashMap::new(),
            rng,
        }
    }

    /// Fold the external snapshot into the score cache. Only vehicles not
    /// already cached are added: a refetch never overwrites scores the
    /// ledger has advanced past the snapshot.
    pub fn absorb_snapshot(&mut self, snapshot: &[(String, Option<i64>)]) {
        for (vehicle_id, trust_score) in snapshot {
            if !self.scores.contains_key(vehicle_id) {
                let score = trust_score.unwrap_or_else(|| self.rng.int_range(70..=95));
                self.scores.insert(vehicle_id.clone(), score);
            }
        }
    }

    /// Current cached score for a vehicle, if it is known to the ledger.
    pub fn current_score(&self, vehicle_id: &str) -> Option<i64> {
        self.scores.get(vehicle_id).copied()
    }

    /// Number of vehicles the ledger currently tracks.
    pub fn tracked_vehicles(&self) -> usize {
        self.scores.len()
    }

    /// Generate this tick's ledger entries. Update count scales with the
    /// business-hours activity factor but never drops below one.
    pub fn tick(
        &mut self,
        now: DateTime<Utc>,
        snapshot: &[(String, Option<i64>)],
    ) -> Vec<TrustLedgerEntry> {
        self.absorb_snapshot(snapshot);

        let factor = trust_activity_factor(now.hour());
        let count = ((self.rng.int_range(1..=5) as f64 * factor).round() as usize).max(1);

        (0..count)
            .map(|_| {
                let vehicle_id = self.pick_vehicle();
                let action = *self
                    .rng
                    .choose(&TrustAction::ALL)
                    .unwrap_or(&TrustAction::TrustScoreUpdate);
                self.apply_action(&vehicle_id, action, now)
            })
            .collect()
    }

    /// Generate up to `count` entries spread across the trailing 24 hours,
    /// thinned during low-activity hours with every third index kept as a
    /// density floor.
    pub fn historical_batch(
        &mut self,
        count: usize,
        now: DateTime<Utc>,
        snapshot: &[(String, Option<i64>)],
    ) -> Vec<TrustLedgerEntry> {
        self.absorb_snapshot(snapshot);

        let mut entries = Vec::new();
        for i in 0..count {
            let hours_ago = self.rng.f64_range(0.0..24.0);
            let timestamp = now - Duration::minutes((hours_ago * 60.0) as i64);

            let factor = trust_activity_factor(timestamp.hour());
            if self.rng.f64_range(0.0..1.0) > factor && i % 3 != 0 {
                continue;
            }

            let vehicle_id = self.pick_vehicle();
            let action = *self
                .rng
                .choose(&TrustAction::ALL)
                .unwrap_or(&TrustAction::TrustScoreUpdate);
            entries.push(self.apply_action(&vehicle_id, action, timestamp));
        }

        entries
    }

    /// Apply one action's transition rule, append the entry, and write the
    /// new value back into the score cache.
    pub fn apply_action(
        &mut self,
        vehicle_id: &str,
        action: TrustAction,
        timestamp: DateTime<Utc>,
    ) -> TrustLedgerEntry {
        let current = match self.scores.get(vehicle_id) {
            Some(score) => *score,
            None => {
                let score = self.rng.int_range(70..=95);
                self.scores.insert(vehicle_id.to_string(), score);
                score
            }
        };

        let (old_value, new_value) = match action {
            TrustAction::TrustScoreUpdate => {
                let step = *self.rng.choose(&TRUST_SCORE_STEPS).unwrap_or(&1);
                (current, (current + step).clamp(0, 100))
            }
            TrustAction::StakeToken => {
                let tokens = self.rng.int_range(1..=100);
                (tokens, tokens)
            }
            TrustAction::UnstakeToken => (self.rng.int_range(1..=50), 0),
            TrustAction::Penalize => (current, (current - self.rng.int_range(5..=15)).max(0)),
            TrustAction::Reward => (current, (current + self.rng.int_range(1..=10)).min(100)),
            TrustAction::CertificateRenewal => (0, 0),
        };

        self.scores.insert(vehicle_id.to_string(), new_value);

        let tx_id = format!(
            "TX{}-{}",
            timestamp.format("%Y%m%d%H%M%S"),
            self.rng.int_range(1000..=9999)
        );

        TrustLedgerEntry {
            tx_id,
            timestamp,
            vehicle_id: vehicle_id.to_string(),
            action,
            old_value,
            new_value,
            details: format!("{} for vehicle {}", action.label(), vehicle_id),
        }
    }

    fn pick_vehicle(&mut self) -> String {
        if self.scores.is_empty() {
            return fallback_vehicle_id(&mut self.rng);
        }
        let ids: Vec<&String> = self.scores.keys().collect();
        ids[self.rng.index(ids.len())].clone()
    }
}
