//! Arm slot categories by release angle measured from vertical.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmSlotCategory {
    Overhead,
    HighThreeQuarter,
    ThreeQuarter,
    LowThreeQuarter,
    Sidearm,
    LowSidearm,
    Submarine,
}

impl ArmSlotCategory {
    pub const ALL: [ArmSlotCategory; 7] = [
        ArmSlotCategory::Overhead,
        ArmSlotCategory::HighThreeQuarter,
        ArmSlotCategory::ThreeQuarter,
        ArmSlotCategory::LowThreeQuarter,
        ArmSlotCategory::Sidearm,
        ArmSlotCategory::LowSidearm,
        ArmSlotCategory::Submarine,
    ];

    /// Angular span `[start, end)` in degrees from vertical.
    pub fn span(&self) -> (f64, f64) {
        match self {
            ArmSlotCategory::Overhead => (0.0, 40.0),
            ArmSlotCategory::HighThreeQuarter => (40.0, 50.0),
            ArmSlotCategory::ThreeQuarter => (50.0, 60.0),
            ArmSlotCategory::LowThreeQuarter => (60.0, 70.0),
            ArmSlotCategory::Sidearm => (70.0, 90.0),
            ArmSlotCategory::LowSidearm => (90.0, 110.0),
            ArmSlotCategory::Submarine => (110.0, 180.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArmSlotCategory::Overhead => "Overhead",
            ArmSlotCategory::HighThreeQuarter => "High Three-Quarter",
            ArmSlotCategory::ThreeQuarter => "Three-Quarter",
            ArmSlotCategory::LowThreeQuarter => "Low Three-Quarter",
            ArmSlotCategory::Sidearm => "Sidearm",
            ArmSlotCategory::LowSidearm => "Low Sidearm",
            ArmSlotCategory::Submarine => "Submarine",
        }
    }

    /// Wedge color (hex) on the arm slot diagram.
    pub fn color_hex(&self) -> &'static str {
        match self {
            ArmSlotCategory::Overhead => "#003366",
            ArmSlotCategory::HighThreeQuarter => "#004488",
            ArmSlotCategory::ThreeQuarter => "#0066AA",
            ArmSlotCategory::LowThreeQuarter => "#0088CC",
            ArmSlotCategory::Sidearm => "#EAAA00",
            ArmSlotCategory::LowSidearm => "#CC8800",
            ArmSlotCategory::Submarine => "#AA6600",
        }
    }

    /// Category containing `angle`; 180° itself is Submarine.
    pub fn from_angle(angle: f64) -> Option<Self> {
        if !(0.0..=180.0).contains(&angle) {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|c| {
                let (start, end) = c.span();
                angle >= start && angle < end
            })
            .or(Some(ArmSlotCategory::Submarine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_angle() {
        assert_eq!(ArmSlotCategory::from_angle(62.0), Some(ArmSlotCategory::LowThreeQuarter));
        assert_eq!(ArmSlotCategory::from_angle(40.0), Some(ArmSlotCategory::HighThreeQuarter));
        assert_eq!(ArmSlotCategory::from_angle(0.0), Some(ArmSlotCategory::Overhead));
        assert_eq!(ArmSlotCategory::from_angle(180.0), Some(ArmSlotCategory::Submarine));
        assert_eq!(ArmSlotCategory::from_angle(-1.0), None);
        assert_eq!(ArmSlotCategory::from_angle(f64::NAN), None);
    }

    #[test]
    fn test_spans_are_contiguous() {
        let spans: Vec<_> = ArmSlotCategory::ALL.iter().map(|c| c.span()).collect();
        for pair in spans.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(spans.first().unwrap().0, 0.0);
        assert_eq!(spans.last().unwrap().1, 180.0);
    }
}
