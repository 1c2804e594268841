//! Property tests over the stochastic models' invariants.

use chrono::Utc;
use proptest::prelude::*;

use traffic_datagen::engine::{
    traffic_intensity, CongestionFieldModel, EngineRng, TrustAction, TrustLedger, TRAFFIC_ZONES,
};

proptest! {
    #[test]
    fn intensity_stays_in_unit_band(seed in any::<u64>(), hour in 0u32..24) {
        let mut rng = EngineRng::seeded(seed);
        let value = traffic_intensity(&mut rng, hour);
        prop_assert!((0.0..=1.0).contains(&value), "intensity {value} at hour {hour}");
    }

    #[test]
    fn congestion_levels_stay_in_range(seed in any::<u64>(), hour in 0u32..24) {
        let mut model = CongestionFieldModel::new(EngineRng::seeded(seed));
        for zone in &TRAFFIC_ZONES {
            let level = model.level_for(zone, hour);
            prop_assert!((0..=100).contains(&level), "level {level} in {}", zone.name);
        }
    }

    #[test]
    fn trust_transitions_stay_in_range(
        seed in any::<u64>(),
        action_index in 0usize..6,
        start in 0i64..=100,
    ) {
        let mut ledger = TrustLedger::new(EngineRng::seeded(seed));
        ledger.absorb_snapshot(&[("TS07-0000-PT".to_string(), Some(start))]);

        let action = TrustAction::ALL[action_index];
        let entry = ledger.apply_action("TS07-0000-PT", action, Utc::now());

        prop_assert!((0..=100).contains(&entry.old_value));
        prop_assert!((0..=100).contains(&entry.new_value));
        let cached = ledger.current_score("TS07-0000-PT");
        prop_assert_eq!(cached, Some(entry.new_value));
    }
}
