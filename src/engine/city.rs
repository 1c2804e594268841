//! Fixed city geography and identity pools
//!
//! Zones are the fixed geographic areas used for congestion modeling;
//! junctions are the named point locations vehicles spawn around. Both are
//! modeled on the Hyderabad road network.

use super::rng::EngineRng;

/// Congestion behavior class for a zone during peak windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneProfile {
    /// Office corridor, boosted during the evening peak
    ItCorridor,
    /// Residential hill area, boosted during the morning peak
    ResidentialHills,
    /// Highway interchange, boosted during both peaks
    HighwayInterchange,
    /// No zone-specific boost
    Standard,
}

/// A fixed named geographic area with a centroid and nominal radius.
#[derive(Debug, Clone, Copy)]
pub struct Zone {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
    pub profile: ZoneProfile,
}

/// A fixed named point location used as a spawn/reference point.
#[derive(Debug, Clone, Copy)]
pub struct Junction {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

pub const TRAFFIC_ZONES: [Zone; 12] = [
    Zone { name: "Hitech City", lat: 17.4435, lng: 78.3772, radius_km: 2.5, profile: ZoneProfile::ItCorridor },
    Zone { name: "Gachibowli", lat: 17.4401, lng: 78.3489, radius_km: 2.0, profile: ZoneProfile::ItCorridor },
    Zone { name: "Banjara Hills", lat: 17.4156, lng: 78.4347, radius_km: 2.2, profile: ZoneProfile::ResidentialHills },
    Zone { name: "Jubilee Hills", lat: 17.4321, lng: 78.4075, radius_km: 2.0, profile: ZoneProfile::ResidentialHills },
    Zone { name: "Secunderabad", lat: 17.4399, lng: 78.4983, radius_km: 2.5, profile: ZoneProfile::Standard },
    Zone { name: "LB Nagar", lat: 17.3468, lng: 78.5548, radius_km: 1.8, profile: ZoneProfile::Standard },
    Zone { name: "Dilsukhnagar", lat: 17.3687, lng: 78.5247, radius_km: 1.5, profile: ZoneProfile::Standard },
    Zone { name: "KPHB Colony", lat: 17.4858, lng: 78.3909, radius_km: 1.8, profile: ZoneProfile::Standard },
    Zone { name: "Madhapur", lat: 17.4484, lng: 78.3908, radius_km: 2.0, profile: ZoneProfile::ItCorridor },
    Zone { name: "Begumpet", lat: 17.4400, lng: 78.4635, radius_km: 1.7, profile: ZoneProfile::Standard },
    Zone { name: "Ameerpet", lat: 17.4374, lng: 78.4487, radius_km: 1.5, profile: ZoneProfile::Standard },
    Zone { name: "NH65-ORR Interchange", lat: 17.4046, lng: 78.3032, radius_km: 1.2, profile: ZoneProfile::HighwayInterchange },
];

pub const KEY_JUNCTIONS: [Junction; 10] = [
    Junction { name: "NH65-ORR Interchange", lat: 17.4046, lng: 78.3032 },
    Junction { name: "LB Nagar Junction", lat: 17.3468, lng: 78.5548 },
    Junction { name: "Gachibowli Junction", lat: 17.4401, lng: 78.3489 },
    Junction { name: "Miyapur X Roads", lat: 17.4937, lng: 78.3428 },
    Junction { name: "Paradise Junction", lat: 17.4432, lng: 78.4982 },
    Junction { name: "Panjagutta Junction", lat: 17.4256, lng: 78.4502 },
    Junction { name: "Dilsukhnagar Bus Stand", lat: 17.3687, lng: 78.5247 },
    Junction { name: "JNTU Junction", lat: 17.4947, lng: 78.3996 },
    Junction { name: "Begumpet Flyover", lat: 17.4400, lng: 78.4635 },
    Junction { name: "MG Bus Station", lat: 17.3834, lng: 78.4783 },
];

const LICENSE_PLATE_SERIES: [&str; 3] = ["TS07", "TS08", "TS09"];

// No I or O, to keep plates unambiguous
const PLATE_LETTERS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const PLATE_DIGITS: &[u8] = b"0123456789";

const FIRST_NAMES: [&str; 32] = [
    "Raj", "Amit", "Vijay", "Sanjay", "Rahul", "Deepak", "Suresh", "Rajesh",
    "Priya", "Anjali", "Deepa", "Sunita", "Anita", "Kavita", "Pooja", "Neha",
    "Mohammed", "Abdul", "Ali", "Aryan", "Kiran", "Rohan", "Vikram", "Aditya",
    "Lakshmi", "Sarita", "Usha", "Geeta", "Meena", "Sita", "Radha", "Shanti",
];

const LAST_NAMES: [&str; 32] = [
    "Kumar", "Singh", "Sharma", "Patel", "Verma", "Gupta", "Jha", "Chatterjee",
    "Reddy", "Rao", "Nair", "Menon", "Iyer", "Khan", "Ahmed", "Chowdhury",
    "Desai", "Patil", "Joshi", "Kapoor", "Malhotra", "Trivedi", "Shah", "Mehta",
    "Banerjee", "Das", "Dutta", "Mukherjee", "Ghosh", "Sinha", "Sen", "Bose",
];

/// Generate a license-plate-style vehicle id in `SERIES-NNNN-LL` format.
pub fn generate_vehicle_id(rng: &mut EngineRng) -> String {
    let series = LICENSE_PLATE_SERIES[rng.index(LICENSE_PLATE_SERIES.len())];
    let numbers: String = (0..4)
        .map(|_| PLATE_DIGITS[rng.index(PLATE_DIGITS.len())] as char)
        .collect();
    let letters: String = (0..2)
        .map(|_| PLATE_LETTERS[rng.index(PLATE_LETTERS.len())] as char)
        .collect();
    format!("{series}-{numbers}-{letters}")
}

/// Synthesized placeholder id used when the external vehicle source has no
/// rows to reference.
pub fn fallback_vehicle_id(rng: &mut EngineRng) -> String {
    format!("TS0{}-{}", rng.int_range(7..=9), rng.int_range(1000..=9999))
}

/// Generate a random owner name from the fixed name pools.
pub fn random_owner_name(rng: &mut EngineRng) -> String {
    let first = FIRST_NAMES[rng.index(FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.index(LAST_NAMES.len())];
    format!("{first} {last}")
}

/// Pick a random junction and return a position near it with small jitter,
/// so vehicles cluster around junctions without stacking on one point.
pub fn random_junction_position(rng: &mut EngineRng) -> (f64, f64, &'static str) {
    let junction = &KEY_JUNCTIONS[rng.index(KEY_JUNCTIONS.len())];
    let lat = junction.lat + rng.f64_range(-0.001..0.001);
    let lng = junction.lng + rng.f64_range(-0.001..0.001);
    (lat, lng, junction.name)
}
