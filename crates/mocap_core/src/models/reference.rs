//! # Reference Ranges
//!
//! "Normal" intervals for pitching metrics, used only for display coloring.
//! Values are MLB averages from Kinatrax (sample ranges).
//!
//! The table is an immutable static built once on first access.

use crate::error::{CoreError, Result};
use crate::models::phase::Phase;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Inclusive `[low, high]` interval.
///
/// Construction rejects reversed or non-finite bounds, so every range that
/// reaches the classifier is well formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceRange {
    low: f64,
    high: f64,
}

impl ReferenceRange {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(CoreError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Distance from the nearest bound, 0.0 inside the range.
    pub fn distance(&self, value: f64) -> f64 {
        if value < self.low {
            self.low - value
        } else if value > self.high {
            value - self.high
        } else {
            0.0
        }
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &ReferenceRange) -> ReferenceRange {
        ReferenceRange {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
        }
    }
}

impl<'de> Deserialize<'de> for ReferenceRange {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (low, high) = <(f64, f64)>::deserialize(deserializer)?;
        ReferenceRange::new(low, high).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ReferenceRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", format_number(self.low), format_number(self.high))
    }
}

/// Format a value with at most one decimal, dropping a trailing `.0`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        // integer cast also folds -0.0 into "0"
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}

// ============================================================================
// Metric keys
// ============================================================================

/// Joint-angle metrics measured at each phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    ShoulderHorizontalAbduction,
    ShoulderAbduction,
    ShoulderExternalRotation,
    ElbowFlexion,
    TrunkForwardTilt,
    TrunkLateralTilt,
    TrunkRotation,
    PelvicForwardTilt,
    PelvicLateralTilt,
    PelvicRotation,
    HipShoulderSeparation,
    KneeFlexion,
}

impl MetricKey {
    pub const ALL: [MetricKey; 12] = [
        MetricKey::ShoulderHorizontalAbduction,
        MetricKey::ShoulderAbduction,
        MetricKey::ShoulderExternalRotation,
        MetricKey::ElbowFlexion,
        MetricKey::TrunkForwardTilt,
        MetricKey::TrunkLateralTilt,
        MetricKey::TrunkRotation,
        MetricKey::PelvicForwardTilt,
        MetricKey::PelvicLateralTilt,
        MetricKey::PelvicRotation,
        MetricKey::HipShoulderSeparation,
        MetricKey::KneeFlexion,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MetricKey::ShoulderHorizontalAbduction => "shoulder_horizontal_abduction",
            MetricKey::ShoulderAbduction => "shoulder_abduction",
            MetricKey::ShoulderExternalRotation => "shoulder_external_rotation",
            MetricKey::ElbowFlexion => "elbow_flexion",
            MetricKey::TrunkForwardTilt => "trunk_forward_tilt",
            MetricKey::TrunkLateralTilt => "trunk_lateral_tilt",
            MetricKey::TrunkRotation => "trunk_rotation",
            MetricKey::PelvicForwardTilt => "pelvic_forward_tilt",
            MetricKey::PelvicLateralTilt => "pelvic_lateral_tilt",
            MetricKey::PelvicRotation => "pelvic_rotation",
            MetricKey::HipShoulderSeparation => "hip_shoulder_separation",
            MetricKey::KneeFlexion => "knee_flexion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::ShoulderHorizontalAbduction => "Shoulder Horizontal Abduction",
            MetricKey::ShoulderAbduction => "Shoulder Abduction",
            MetricKey::ShoulderExternalRotation => "Shoulder External Rotation",
            MetricKey::ElbowFlexion => "Elbow Flexion",
            MetricKey::TrunkForwardTilt => "Trunk Forward Tilt",
            MetricKey::TrunkLateralTilt => "Trunk Lateral Tilt",
            MetricKey::TrunkRotation => "Trunk Rotation",
            MetricKey::PelvicForwardTilt => "Pelvic Forward Tilt",
            MetricKey::PelvicLateralTilt => "Pelvic Lateral Tilt",
            MetricKey::PelvicRotation => "Pelvic Rotation",
            MetricKey::HipShoulderSeparation => "Hip-Shoulder Separation",
            MetricKey::KneeFlexion => "Knee Flexion",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

/// Single-valued metrics (peaks, forces, torques, arm slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarMetric {
    ShoulderForceN,
    ShoulderForceBw,
    ShoulderHorizontalAbductionTorqueNm,
    ShoulderHorizontalAbductionTorqueBwh,
    ShoulderInternalRotationTorqueNm,
    ShoulderInternalRotationTorqueBwh,
    ElbowTorqueNm,
    ElbowTorqueBwh,
    KneeAngularVelocity,
    PelvisAngularVelocity,
    TrunkAngularVelocity,
    ElbowAngularVelocity,
    ShoulderAngularVelocity,
    ArmSlot,
}

impl ScalarMetric {
    pub const ALL: [ScalarMetric; 14] = [
        ScalarMetric::ShoulderForceN,
        ScalarMetric::ShoulderForceBw,
        ScalarMetric::ShoulderHorizontalAbductionTorqueNm,
        ScalarMetric::ShoulderHorizontalAbductionTorqueBwh,
        ScalarMetric::ShoulderInternalRotationTorqueNm,
        ScalarMetric::ShoulderInternalRotationTorqueBwh,
        ScalarMetric::ElbowTorqueNm,
        ScalarMetric::ElbowTorqueBwh,
        ScalarMetric::KneeAngularVelocity,
        ScalarMetric::PelvisAngularVelocity,
        ScalarMetric::TrunkAngularVelocity,
        ScalarMetric::ElbowAngularVelocity,
        ScalarMetric::ShoulderAngularVelocity,
        ScalarMetric::ArmSlot,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ScalarMetric::ShoulderForceN => "shoulder_force_n",
            ScalarMetric::ShoulderForceBw => "shoulder_force_bw",
            ScalarMetric::ShoulderHorizontalAbductionTorqueNm => {
                "shoulder_horizontal_abduction_torque_nm"
            }
            ScalarMetric::ShoulderHorizontalAbductionTorqueBwh => {
                "shoulder_horizontal_abduction_torque_bwh"
            }
            ScalarMetric::ShoulderInternalRotationTorqueNm => "shoulder_internal_rotation_torque_nm",
            ScalarMetric::ShoulderInternalRotationTorqueBwh => {
                "shoulder_internal_rotation_torque_bwh"
            }
            ScalarMetric::ElbowTorqueNm => "elbow_torque_nm",
            ScalarMetric::ElbowTorqueBwh => "elbow_torque_bwh",
            ScalarMetric::KneeAngularVelocity => "knee_angular_velocity",
            ScalarMetric::PelvisAngularVelocity => "pelvis_angular_velocity",
            ScalarMetric::TrunkAngularVelocity => "trunk_angular_velocity",
            ScalarMetric::ElbowAngularVelocity => "elbow_angular_velocity",
            ScalarMetric::ShoulderAngularVelocity => "shoulder_angular_velocity",
            ScalarMetric::ArmSlot => "arm_slot",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScalarMetric::ShoulderForceN => "Shoulder Force",
            ScalarMetric::ShoulderForceBw => "Shoulder Force",
            ScalarMetric::ShoulderHorizontalAbductionTorqueNm
            | ScalarMetric::ShoulderHorizontalAbductionTorqueBwh => "Horiz Abd Torque",
            ScalarMetric::ShoulderInternalRotationTorqueNm
            | ScalarMetric::ShoulderInternalRotationTorqueBwh => "Shoulder Torque",
            ScalarMetric::ElbowTorqueNm | ScalarMetric::ElbowTorqueBwh => "Elbow Torque",
            ScalarMetric::KneeAngularVelocity => "Knee",
            ScalarMetric::PelvisAngularVelocity => "Pelvis",
            ScalarMetric::TrunkAngularVelocity => "Trunk",
            ScalarMetric::ElbowAngularVelocity => "Elbow",
            ScalarMetric::ShoulderAngularVelocity => "Shoulder",
            ScalarMetric::ArmSlot => "Arm Slot",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ScalarMetric::ShoulderForceN => "N",
            ScalarMetric::ShoulderForceBw => "%BW",
            ScalarMetric::ShoulderHorizontalAbductionTorqueNm
            | ScalarMetric::ShoulderInternalRotationTorqueNm
            | ScalarMetric::ElbowTorqueNm => "Nm",
            ScalarMetric::ShoulderHorizontalAbductionTorqueBwh
            | ScalarMetric::ShoulderInternalRotationTorqueBwh
            | ScalarMetric::ElbowTorqueBwh => "%BWH",
            ScalarMetric::KneeAngularVelocity
            | ScalarMetric::PelvisAngularVelocity
            | ScalarMetric::TrunkAngularVelocity
            | ScalarMetric::ElbowAngularVelocity
            | ScalarMetric::ShoulderAngularVelocity => "°/s",
            ScalarMetric::ArmSlot => "°",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

// ============================================================================
// Reference table
// ============================================================================

/// Lookup of reference ranges by (metric, phase) and by scalar metric.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    phase_ranges: HashMap<(MetricKey, Phase), ReferenceRange>,
    scalar_ranges: HashMap<ScalarMetric, ReferenceRange>,
}

/// Process-wide reference table.
pub static REFERENCE_TABLE: Lazy<ReferenceTable> = Lazy::new(ReferenceTable::mlb_kinatrax);

impl ReferenceTable {
    /// MLB averages from Kinatrax (sample ranges).
    pub fn mlb_kinatrax() -> Self {
        use MetricKey::*;
        use Phase::*;

        let mut table = Self::default();

        let phase_rows: [(MetricKey, Phase, f64, f64); 34] = [
            (ShoulderHorizontalAbduction, FootPlant, -36.0, -12.0),
            (ShoulderHorizontalAbduction, MaxExternalRotation, -7.0, 15.0),
            (ShoulderHorizontalAbduction, Release, -1.0, 23.0),
            (ShoulderAbduction, FootPlant, 80.0, 100.0),
            (ShoulderAbduction, MaxExternalRotation, 82.0, 98.0),
            (ShoulderAbduction, Release, 82.0, 98.0),
            (ShoulderExternalRotation, FootPlant, 14.0, 90.0),
            (ShoulderExternalRotation, MaxExternalRotation, 170.0, 188.0),
            (ShoulderExternalRotation, Release, 97.0, 121.0),
            (ElbowFlexion, FootPlant, 94.0, 124.0),
            (ElbowFlexion, MaxExternalRotation, 74.0, 94.0),
            (ElbowFlexion, Release, 20.0, 30.0),
            (TrunkForwardTilt, FootPlant, 9.0, 21.0),
            (TrunkForwardTilt, MaxExternalRotation, 10.0, 22.0),
            (TrunkForwardTilt, Release, 26.0, 40.0),
            (TrunkLateralTilt, FootPlant, -10.0, 0.0),
            (TrunkLateralTilt, MaxExternalRotation, 13.0, 29.0),
            (TrunkLateralTilt, Release, 8.0, 28.0),
            (TrunkRotation, FootPlant, 95.0, 118.0),
            (TrunkRotation, MaxExternalRotation, -5.0, 15.0),
            (TrunkRotation, Release, -24.0, -4.0),
            (PelvicForwardTilt, FootPlant, 0.0, 14.0),
            (PelvicForwardTilt, MaxExternalRotation, 32.0, 46.0),
            (PelvicForwardTilt, Release, 40.0, 56.0),
            (PelvicLateralTilt, FootPlant, -3.0, 5.0),
            (PelvicLateralTilt, MaxExternalRotation, -3.0, 13.0),
            (PelvicLateralTilt, Release, -5.0, 11.0),
            (PelvicRotation, FootPlant, 30.0, 76.0),
            (PelvicRotation, MaxExternalRotation, -10.0, 6.0),
            (PelvicRotation, Release, -14.0, 2.0),
            (HipShoulderSeparation, FootPlant, 32.0, 52.0),
            (KneeFlexion, FootPlant, 43.0, 57.0),
            (KneeFlexion, MaxExternalRotation, 40.0, 60.0),
            (KneeFlexion, Release, 28.0, 56.0),
        ];
        for (metric, phase, low, high) in phase_rows {
            table.insert_phase(metric, phase, low, high);
        }

        let scalar_rows: [(ScalarMetric, f64, f64); 10] = [
            (ScalarMetric::ShoulderForceBw, 176.0, 224.0),
            (ScalarMetric::ShoulderForceN, 1361.0, 1929.0),
            (ScalarMetric::ShoulderInternalRotationTorqueBwh, 17.0, 29.0),
            (ScalarMetric::ShoulderInternalRotationTorqueNm, 151.0, 277.0),
            (ScalarMetric::ElbowTorqueBwh, 13.0, 17.0),
            (ScalarMetric::ElbowTorqueNm, 115.0, 171.0),
            (ScalarMetric::PelvisAngularVelocity, 581.0, 811.0),
            (ScalarMetric::TrunkAngularVelocity, 861.0, 1187.0),
            (ScalarMetric::ElbowAngularVelocity, 2030.0, 2542.0),
            (ScalarMetric::ShoulderAngularVelocity, 3801.0, 4923.0),
        ];
        for (metric, low, high) in scalar_rows {
            table.insert_scalar(metric, low, high);
        }

        table
    }

    fn insert_phase(&mut self, metric: MetricKey, phase: Phase, low: f64, high: f64) {
        match ReferenceRange::new(low, high) {
            Ok(range) => {
                self.phase_ranges.insert((metric, phase), range);
            }
            Err(err) => warn!("Skipping reference for {} {}: {}", metric.key(), phase, err),
        }
    }

    fn insert_scalar(&mut self, metric: ScalarMetric, low: f64, high: f64) {
        match ReferenceRange::new(low, high) {
            Ok(range) => {
                self.scalar_ranges.insert(metric, range);
            }
            Err(err) => warn!("Skipping reference for {}: {}", metric.key(), err),
        }
    }

    pub fn phase_range(&self, metric: MetricKey, phase: Phase) -> Option<&ReferenceRange> {
        self.phase_ranges.get(&(metric, phase))
    }

    pub fn scalar_range(&self, metric: ScalarMetric) -> Option<&ReferenceRange> {
        self.scalar_ranges.get(&metric)
    }

    /// Range spanning every phase reference of a metric (chart band).
    pub fn envelope(&self, metric: MetricKey) -> Option<ReferenceRange> {
        Phase::ALL
            .iter()
            .filter_map(|phase| self.phase_range(metric, *phase))
            .fold(None, |acc: Option<ReferenceRange>, range| {
                Some(match acc {
                    Some(current) => current.union(range),
                    None => *range,
                })
            })
    }

    pub fn phase_count(&self) -> usize {
        self.phase_ranges.len()
    }

    pub fn scalar_count(&self) -> usize {
        self.scalar_ranges.len()
    }
}
