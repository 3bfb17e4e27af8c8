//! Pitching-motion phase markers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key instants of a pitch delivery, in temporal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Lead foot fully contacts the ground
    #[serde(rename = "FP")]
    FootPlant,
    /// Throwing shoulder reaches its maximum external rotation
    #[serde(rename = "MER")]
    MaxExternalRotation,
    /// Ball release (maximum wrist velocity)
    #[serde(rename = "REL")]
    Release,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::FootPlant, Phase::MaxExternalRotation, Phase::Release];

    /// Short code used in tables and column names.
    pub fn code(&self) -> &'static str {
        match self {
            Phase::FootPlant => "FP",
            Phase::MaxExternalRotation => "MER",
            Phase::Release => "REL",
        }
    }

    /// Display name for table headers.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::FootPlant => "Foot Plant",
            Phase::MaxExternalRotation => "Max External Rotation",
            Phase::Release => "Release",
        }
    }

    /// Column suffix in trial tables (`shoulder_abduction_fp`).
    pub fn column_suffix(&self) -> &'static str {
        match self {
            Phase::FootPlant => "fp",
            Phase::MaxExternalRotation => "mer",
            Phase::Release => "rel",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "FP" => Some(Phase::FootPlant),
            "MER" => Some(Phase::MaxExternalRotation),
            "REL" => Some(Phase::Release),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert!(Phase::FootPlant < Phase::MaxExternalRotation);
        assert!(Phase::MaxExternalRotation < Phase::Release);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Phase::from_code("mer"), Some(Phase::MaxExternalRotation));
        assert_eq!(Phase::from_code(" REL "), Some(Phase::Release));
        assert_eq!(Phase::from_code("MKH"), None);
    }

    #[test]
    fn test_serde_codes() {
        let json = serde_json::to_string(&Phase::FootPlant).unwrap();
        assert_eq!(json, "\"FP\"");
        let back: Phase = serde_json::from_str("\"REL\"").unwrap();
        assert_eq!(back, Phase::Release);
    }
}
