//! Record types and fixed weighted category sets
//!
//! These are the shapes of the rows handed to the persistence sink. Field
//! names match the wire column names of the four tables.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Type of vehicle, with the fixed population distribution attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VehicleCategory {
    Car,
    Truck,
    Bus,
    Ambulance,
    #[serde(rename = "Two-Wheeler")]
    TwoWheeler,
}

impl VehicleCategory {
    /// Weighted distribution used when spawning vehicles.
    pub const WEIGHTED: [(VehicleCategory, f64); 5] = [
        (VehicleCategory::Car, 0.60),
        (VehicleCategory::Truck, 0.10),
        (VehicleCategory::Bus, 0.05),
        (VehicleCategory::Ambulance, 0.03),
        (VehicleCategory::TwoWheeler, 0.22),
    ];

    /// Nominal cruising speed per category, used for historical records.
    pub fn base_speed_kmh(&self) -> f64 {
        match self {
            VehicleCategory::Car => 45.0,
            VehicleCategory::Truck => 35.0,
            VehicleCategory::Bus => 30.0,
            VehicleCategory::Ambulance => 55.0,
            VehicleCategory::TwoWheeler => 50.0,
        }
    }
}

/// Whether a vehicle is part of the active population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VehicleStatus {
    Active,
    Inactive,
}

/// Categorized anomaly type with the fixed occurrence distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnomalyType {
    Overspeed,
    #[serde(rename = "Emergency Braking")]
    EmergencyBraking,
    #[serde(rename = "RSU Offline")]
    RsuOffline,
    #[serde(rename = "Signal Tampering")]
    SignalTampering,
    #[serde(rename = "GPS Spoofing")]
    GpsSpoofing,
    #[serde(rename = "Unauthorized Access")]
    UnauthorizedAccess,
    #[serde(rename = "Software Malfunction")]
    SoftwareMalfunction,
}

impl AnomalyType {
    pub const WEIGHTED: [(AnomalyType, f64); 7] = [
        (AnomalyType::Overspeed, 0.35),
        (AnomalyType::EmergencyBraking, 0.20),
        (AnomalyType::RsuOffline, 0.15),
        (AnomalyType::SignalTampering, 0.10),
        (AnomalyType::GpsSpoofing, 0.10),
        (AnomalyType::UnauthorizedAccess, 0.05),
        (AnomalyType::SoftwareMalfunction, 0.05),
    ];
}

/// Ordered anomaly severity with the fixed selection weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const WEIGHTED: [(Severity, f64); 4] = [
        (Severity::Low, 0.4),
        (Severity::Medium, 0.3),
        (Severity::High, 0.2),
        (Severity::Critical, 0.1),
    ];
}

/// Lifecycle status of an anomaly event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnomalyStatus {
    Detected,
    Resolved,
}

/// Trust/stake action recorded in the ledger. Actions are drawn uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrustAction {
    #[serde(rename = "Trust Score Update")]
    TrustScoreUpdate,
    #[serde(rename = "Stake Token")]
    StakeToken,
    #[serde(rename = "Unstake Token")]
    UnstakeToken,
    Penalize,
    Reward,
    #[serde(rename = "Certificate Renewal")]
    CertificateRenewal,
}

impl TrustAction {
    pub const ALL: [TrustAction; 6] = [
        TrustAction::TrustScoreUpdate,
        TrustAction::StakeToken,
        TrustAction::UnstakeToken,
        TrustAction::Penalize,
        TrustAction::Reward,
        TrustAction::CertificateRenewal,
    ];

    /// Human-readable label used in ledger entry details.
    pub fn label(&self) -> &'static str {
        match self {
            TrustAction::TrustScoreUpdate => "Trust Score Update",
            TrustAction::StakeToken => "Stake Token",
            TrustAction::UnstakeToken => "Unstake Token",
            TrustAction::Penalize => "Penalize",
            TrustAction::Reward => "Reward",
            TrustAction::CertificateRenewal => "Certificate Renewal",
        }
    }
}

/// One vehicle snapshot row for the `vehicles` table.
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub vehicle_id: String,
    pub owner_name: String,
    pub vehicle_type: VehicleCategory,
    pub trust_score: i64,
    pub lat: f64,
    pub lng: f64,
    pub speed: f64,
    pub heading: i64,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub status: VehicleStatus,
}

/// One congestion level row for the `zones_congestion` table.
#[derive(Debug, Clone, Serialize)]
pub struct CongestionRecord {
    pub zone_name: String,
    pub lat: f64,
    pub lng: f64,
    pub congestion_level: i64,
    pub updated_at: DateTime<Utc>,
}

/// One anomaly event row for the `anomalies` table. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct AnomalyEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub vehicle_id: String,
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    pub message: String,
    pub status: AnomalyStatus,
}

/// One ledger entry row for the `trust_ledger` table. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct TrustLedgerEntry {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub vehicle_id: String,
    pub action: TrustAction,
    pub old_value: i64,
    pub new_value: i64,
    pub details: String,
}
