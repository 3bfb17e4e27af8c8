//! # Range Classifier
//!
//! Buckets a measurement against its reference range:
//! - inside `[low, high]` → `InRange`
//! - outside, but no further than one std dev → `NearRange`
//! - further outside → `OutOfRange`
//! - no reference available → `Unclassified`
//!
//! Being in or out of range is a guide for the reader, not a judgement.

use crate::models::reference::ReferenceRange;
use serde::{Deserialize, Serialize};

/// Qualitative bucket of a measurement relative to its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    InRange,
    NearRange,
    OutOfRange,
    Unclassified,
}

impl Classification {
    /// Legend text for the report.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::InRange => "Within the reference range",
            Classification::NearRange => {
                "Between the reference range and one Std Dev outside of it"
            }
            Classification::OutOfRange => "Greater than one Std Dev outside of the reference range",
            Classification::Unclassified => "No reference data",
        }
    }

    pub fn is_classified(&self) -> bool {
        !matches!(self, Classification::Unclassified)
    }
}

/// Classify `value` against `range`, widening by `std` for the near band.
///
/// A non-positive `std` leaves no near band. NaN values are out of range.
pub fn classify(value: f64, range: Option<&ReferenceRange>, std: Option<f64>) -> Classification {
    let Some(range) = range else {
        return Classification::Unclassified;
    };

    if range.contains(value) {
        return Classification::InRange;
    }

    let distance = if value < range.low() {
        range.low() - value
    } else {
        value - range.high()
    };

    match std {
        Some(std) if distance <= std => Classification::NearRange,
        _ => Classification::OutOfRange,
    }
}
