//! Behavior tests for the four generator models

use chrono::{Duration, TimeZone, Utc};
use std::collections::HashSet;

use traffic_datagen::engine::{
    traffic_intensity, trust_activity_factor, AnomalyEventProcess, AnomalyStatus,
    CongestionFieldModel, EngineRng, TrustAction, TrustLedger, VehiclePopulationManager,
    VehicleStatus, ZoneProfile, MAX_RETIREMENTS_PER_TICK, MAX_SPAWNS_PER_TICK, TRAFFIC_ZONES,
};

#[test]
fn intensity_morning_peak_stays_in_band() {
    let mut rng = EngineRng::seeded(1);
    for _ in 0..1000 {
        let value = traffic_intensity(&mut rng, 8);
        assert!(
            (0.80..=1.00).contains(&value),
            "morning peak intensity out of band: {value}"
        );
    }
}

#[test]
fn intensity_late_night_stays_in_band() {
    let mut rng = EngineRng::seeded(2);
    for _ in 0..1000 {
        let value = traffic_intensity(&mut rng, 2);
        assert!(
            (0.10..=0.20).contains(&value),
            "late night intensity out of band: {value}"
        );
    }
}

#[test]
fn trust_activity_factor_matches_windows() {
    assert_eq!(trust_activity_factor(10), 1.5);
    assert_eq!(trust_activity_factor(16), 1.5);
    assert_eq!(trust_activity_factor(23), 0.3);
    assert_eq!(trust_activity_factor(3), 0.3);
    assert_eq!(trust_activity_factor(20), 1.0);
    assert_eq!(trust_activity_factor(6), 1.0);
}

#[test]
fn spawned_vehicles_have_valid_fields() {
    let mut manager = VehiclePopulationManager::new(EngineRng::seeded(3));

    for _ in 0..200 {
        let vehicle = manager.spawn_vehicle();

        let parts: Vec<&str> = vehicle.vehicle_id.split('-').collect();
        assert_eq!(parts.len(), 3, "bad id format: {}", vehicle.vehicle_id);
        assert!(parts[0].starts_with("TS0"));
        assert_eq!(parts[1].len(), 4);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 2);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase()));

        assert!((70..=100).contains(&vehicle.trust_score));
        assert!((0.0..=80.0).contains(&vehicle.speed));
        assert!((0..=359).contains(&vehicle.heading));
        assert_eq!(vehicle.status, VehicleStatus::Active);
        assert!(!vehicle.owner_name.is_empty());
        assert!(!vehicle.location.is_empty());
    }
}

#[test]
fn rebalance_growth_is_bounded_and_converges() {
    let mut manager = VehiclePopulationManager::new(EngineRng::seeded(4));
    let target = 500;

    let mut previous = manager.len();
    let mut ticks = 0;
    while manager.len() < target {
        manager.rebalance(target);
        let grown = manager.len() - previous;
        assert!(
            grown <= MAX_SPAWNS_PER_TICK,
            "grew by {grown} in one tick"
        );
        previous = manager.len();
        ticks += 1;
        assert!(ticks <= target / MAX_SPAWNS_PER_TICK, "did not converge");
    }
    assert_eq!(manager.len(), target);
}

#[test]
fn rebalance_shrink_is_bounded() {
    let mut manager = VehiclePopulationManager::with_initial_population(EngineRng::seeded(5), 100);

    manager.rebalance(50);
    assert_eq!(manager.len(), 100 - MAX_RETIREMENTS_PER_TICK);

    // Shrinking below zero is impossible even with an absurd target
    let mut empty = VehiclePopulationManager::new(EngineRng::seeded(6));
    empty.rebalance(0);
    assert_eq!(empty.len(), 0);
}

#[test]
fn advance_tick_keeps_kinematics_in_range() {
    let mut manager = VehiclePopulationManager::with_initial_population(EngineRng::seeded(7), 50);

    for _ in 0..100 {
        let batch = manager.advance_tick(5.0);
        assert_eq!(batch.len(), 50);
        for vehicle in &batch {
            assert!((0.0..=80.0).contains(&vehicle.speed));
            assert!((0..=359).contains(&vehicle.heading));
        }
    }
}

#[test]
fn advance_tick_moves_vehicles_with_nonzero_speed() {
    let mut manager = VehiclePopulationManager::with_initial_population(EngineRng::seeded(8), 30);
    let before: std::collections::HashMap<String, (f64, f64)> = manager
        .advance_tick(5.0)
        .into_iter()
        .map(|v| (v.vehicle_id, (v.lat, v.lng)))
        .collect();
    let after = manager.advance_tick(5.0);

    let moved = after.iter().any(|v| {
        v.speed > 0.0
            && before
                .get(&v.vehicle_id)
                .is_some_and(|&(lat, lng)| v.lat != lat || v.lng != lng)
    });
    assert!(moved, "no vehicle moved across two ticks");
}

#[test]
fn vehicle_historical_batch_draws_from_bounded_pool() {
    let mut manager = VehiclePopulationManager::new(EngineRng::seeded(9));
    let now = Utc::now();
    let records = manager.historical_batch(5000);

    assert!(!records.is_empty());

    let unique_ids: HashSet<&str> = records.iter().map(|v| v.vehicle_id.as_str()).collect();
    assert!(unique_ids.len() <= 500, "pool larger than count/10");

    let window_start = now - Duration::hours(24) - Duration::minutes(1);
    for record in &records {
        assert!((60..=100).contains(&record.trust_score));
        assert!(record.speed > 0.0);
        assert!(record.timestamp <= Utc::now());
        assert!(record.timestamp >= window_start);
    }
}

#[test]
fn congestion_tick_covers_every_zone_within_bounds() {
    let mut model = CongestionFieldModel::new(EngineRng::seeded(10));
    let records = model.tick(Utc::now());

    assert_eq!(records.len(), TRAFFIC_ZONES.len());
    for record in &records {
        assert!(
            (0..=100).contains(&record.congestion_level),
            "level out of range: {}",
            record.congestion_level
        );
    }
}

#[test]
fn congestion_is_deterministic_for_a_fixed_seed() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 18, 30, 0).unwrap();

    let mut first = CongestionFieldModel::new(EngineRng::seeded(42));
    let mut second = CongestionFieldModel::new(EngineRng::seeded(42));

    let a = first.tick(now);
    let b = second.tick(now);

    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.zone_name, y.zone_name);
        assert_eq!(x.congestion_level, y.congestion_level);
    }
}

#[test]
fn highway_interchange_peaks_beat_midday_standard_zone() {
    let mut model = CongestionFieldModel::new(EngineRng::seeded(11));

    let highway = TRAFFIC_ZONES
        .iter()
        .find(|z| z.profile == ZoneProfile::HighwayInterchange)
        .expect("highway zone present");
    let standard = TRAFFIC_ZONES
        .iter()
        .find(|z| z.profile == ZoneProfile::Standard)
        .expect("standard zone present");

    let samples = 500;
    let peak_avg: f64 = (0..samples)
        .map(|i| model.level_for(highway, if i % 2 == 0 { 8 } else { 18 }) as f64)
        .sum::<f64>()
        / samples as f64;
    let lull_avg: f64 = (0..samples)
        .map(|_| model.level_for(standard, 13) as f64)
        .sum::<f64>()
        / samples as f64;

    assert!(
        peak_avg >= lull_avg,
        "expected peak {peak_avg} >= lull {lull_avg}"
    );
}

#[test]
fn congestion_historical_batch_covers_24h_at_5min_resolution() {
    let mut model = CongestionFieldModel::new(EngineRng::seeded(12));
    let records = model.historical_batch(Utc::now());

    // 288 five-minute steps per zone
    assert_eq!(records.len(), TRAFFIC_ZONES.len() * 288);
}

#[test]
fn anomaly_tick_emits_at_least_one_event_from_known_pool() {
    let mut process = AnomalyEventProcess::new(EngineRng::seeded(13));
    let known = vec!["TS07-0001-AB".to_string(), "TS08-0002-CD".to_string()];

    for hour in [2u32, 8, 13, 18] {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap();
        let events = process.tick(now, &known);
        assert!(!events.is_empty());
        for event in &events {
            assert!(known.contains(&event.vehicle_id));
            assert_eq!(event.status, AnomalyStatus::Detected);
            assert!(!event.message.is_empty());
        }
    }
}

#[test]
fn anomaly_tick_synthesizes_ids_when_snapshot_is_empty() {
    let mut process = AnomalyEventProcess::new(EngineRng::seeded(14));
    let events = process.tick(Utc::now(), &[]);

    assert!(!events.is_empty());
    for event in &events {
        assert!(
            event.vehicle_id.starts_with("TS0"),
            "unexpected fallback id: {}",
            event.vehicle_id
        );
    }
}

#[test]
fn anomaly_historical_batch_resolves_roughly_seventy_percent() {
    let mut process = AnomalyEventProcess::new(EngineRng::seeded(15));
    let known: Vec<String> = (0..100).map(|i| format!("TS07-{i:04}-AB")).collect();

    let events = process.historical_batch(10_000, Utc::now(), &known);
    assert!(!events.is_empty());

    let resolved = events
        .iter()
        .filter(|e| e.status == AnomalyStatus::Resolved)
        .count() as f64;
    let ratio = resolved / events.len() as f64;
    assert!(
        (0.65..=0.75).contains(&ratio),
        "resolved ratio out of band: {ratio}"
    );

    for event in &events {
        assert!(known.contains(&event.vehicle_id));
    }
}

#[test]
fn unstake_token_always_yields_zero() {
    let mut ledger = TrustLedger::new(EngineRng::seeded(16));
    ledger.absorb_snapshot(&[("TS07-1111-AA".to_string(), Some(88))]);

    for _ in 0..100 {
        let entry = ledger.apply_action("TS07-1111-AA", TrustAction::UnstakeToken, Utc::now());
        assert_eq!(entry.new_value, 0);
        assert!((1..=50).contains(&entry.old_value));
    }
}

#[test]
fn certificate_renewal_is_a_zero_zero_entry() {
    let mut ledger = TrustLedger::new(EngineRng::seeded(17));
    let entry = ledger.apply_action("TS07-2222-BB", TrustAction::CertificateRenewal, Utc::now());
    assert_eq!(entry.old_value, 0);
    assert_eq!(entry.new_value, 0);
}

#[test]
fn ledger_fold_reproduces_cached_scores() {
    let mut ledger = TrustLedger::new(EngineRng::seeded(18));
    let snapshot: Vec<(String, Option<i64>)> = (0..10)
        .map(|i| (format!("TS07-{i:04}-ZZ"), Some(80)))
        .collect();

    let mut entries = Vec::new();
    for minute in 0..60 {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, minute, 0).unwrap();
        entries.extend(ledger.tick(now, &snapshot));
    }

    // Fold per vehicle in timestamp order; the last new_value must match
    // the maintained cache exactly.
    entries.sort_by_key(|e| e.timestamp);
    for (vehicle_id, _) in &snapshot {
        let folded = entries
            .iter()
            .filter(|e| &e.vehicle_id == vehicle_id)
            .map(|e| e.new_value)
            .last();
        if let Some(score) = folded {
            assert_eq!(ledger.current_score(vehicle_id), Some(score));
        }
    }
}

#[test]
fn snapshot_refresh_never_overwrites_advanced_scores() {
    let mut ledger = TrustLedger::new(EngineRng::seeded(19));
    ledger.absorb_snapshot(&[("TS09-0001-QQ".to_string(), Some(50))]);

    let entry = ledger.apply_action("TS09-0001-QQ", TrustAction::Reward, Utc::now());
    assert!(entry.new_value > 50);

    // A stale refetch must not roll the cache back
    ledger.absorb_snapshot(&[("TS09-0001-QQ".to_string(), Some(10))]);
    assert_eq!(ledger.current_score("TS09-0001-QQ"), Some(entry.new_value));
}
