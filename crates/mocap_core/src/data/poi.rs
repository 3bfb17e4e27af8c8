//! Point-of-interest (POI) pitch filtering.
//!
//! The POI metrics CSV has one row per pitch. Reports compare a pitcher
//! against a cohort of similar throwers: velocity band, handedness and
//! arm slot.

use crate::data::trials::TrialTable;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SPEED_COLUMN: &str = "pitch_speed_mph";
pub const THROWS_COLUMN: &str = "p_throws";
pub const ARM_SLOT_COLUMN: &str = "arm_slot";

/// Cohort filter. Speed bounds are exclusive, arm slot bounds inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiFilter {
    pub min_speed_mph: f64,
    pub max_speed_mph: f64,
    /// Throwing hand ("R" / "L")
    pub throws: String,
    pub min_arm_slot: f64,
    pub max_arm_slot: f64,
}

impl Default for PoiFilter {
    fn default() -> Self {
        Self {
            min_speed_mph: 88.0,
            max_speed_mph: 95.0,
            throws: "R".to_string(),
            min_arm_slot: 39.0,
            max_arm_slot: 45.0,
        }
    }
}

impl PoiFilter {
    pub fn matches(&self, speed: f64, throws: &str, arm_slot: f64) -> bool {
        speed > self.min_speed_mph
            && speed < self.max_speed_mph
            && throws.eq_ignore_ascii_case(&self.throws)
            && arm_slot >= self.min_arm_slot
            && arm_slot <= self.max_arm_slot
    }

    /// Reject bounds that no pitch can satisfy.
    pub fn check(&self) -> Result<()> {
        if self.min_speed_mph >= self.max_speed_mph || self.min_arm_slot > self.max_arm_slot {
            return Err(CoreError::InvalidConfig(format!(
                "empty cohort filter: speed ({}, {}), arm slot [{}, {}]",
                self.min_speed_mph, self.max_speed_mph, self.min_arm_slot, self.max_arm_slot
            )));
        }
        Ok(())
    }

    /// Rows of `table` that fall inside the cohort.
    pub fn apply(&self, table: &TrialTable) -> Result<TrialTable> {
        self.check()?;
        let speed = table.require_numeric(SPEED_COLUMN)?;
        let throws = table.require_text(THROWS_COLUMN)?;
        let arm_slot = table.require_numeric(ARM_SLOT_COLUMN)?;

        let filtered =
            table.filter_rows(|row| self.matches(speed[row], &throws[row], arm_slot[row]));
        info!(
            "POI filter kept {} of {} pitches",
            filtered.len(),
            table.len()
        );
        Ok(filtered)
    }
}
