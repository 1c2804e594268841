//! Time-of-day traffic intensity signal
//!
//! All four models read the same hour-of-day activity curve: heavy morning
//! and evening peaks, a midday lull, and a quiet late night. The jitter is
//! drawn fresh on every call, never memoized.

use super::rng::EngineRng;

/// Traffic intensity in roughly `[0.1, 1.0]` for the given hour of day.
pub fn traffic_intensity(rng: &mut EngineRng, hour: u32) -> f64 {
    match hour {
        7..=9 => 0.80 + rng.f64_range(0.10..0.20),
        17..=19 => 0.85 + rng.f64_range(0.10..0.15),
        11..=14 => 0.40 + rng.f64_range(0.10..0.20),
        23 | 0..=4 => 0.10 + rng.f64_range(0.05..0.10),
        _ => 0.50 + rng.f64_range(0.10..0.15),
    }
}

/// Trust-ledger activity factor: busier during business hours, quiet at
/// night. Deterministic, no jitter.
pub fn trust_activity_factor(hour: u32) -> f64 {
    if (9..17).contains(&hour) {
        1.5
    } else if hour >= 23 || hour < 6 {
        0.3
    } else {
        1.0
    }
}
