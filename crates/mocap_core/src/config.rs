//! # Report Configuration
//!
//! YAML file describing who the report is for and where its data comes
//! from. Every field has a default, so an empty file is a valid config.
//!
//! ```yaml
//! player_name: Luke Coats
//! velocity_range: 90mph - 92mph
//! csv: data/poi_metrics.csv
//! events: { fp: 0.5, mer: 0.7, rel: 0.85 }
//! filter: { min_speed_mph: 88, max_speed_mph: 95, throws: R }
//! columns:
//!   pelvis_angular_velocity: max_pelvis_rotational_velo
//! ```

use crate::data::poi::PoiFilter;
use crate::error::{CoreError, Result};
use crate::models::metrics::ColumnMap;
use crate::models::phase::Phase;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::{Validate, ValidationError};

/// Normalized event times on the chart time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_event_order"))]
pub struct EventTimes {
    #[serde(rename = "fp")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub foot_plant: f64,
    #[serde(rename = "mer")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_external_rotation: f64,
    #[serde(rename = "rel")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub release: f64,
}

impl Default for EventTimes {
    fn default() -> Self {
        Self {
            foot_plant: 0.5,
            max_external_rotation: 0.7,
            release: 0.85,
        }
    }
}

impl EventTimes {
    pub fn time(&self, phase: Phase) -> f64 {
        match phase {
            Phase::FootPlant => self.foot_plant,
            Phase::MaxExternalRotation => self.max_external_rotation,
            Phase::Release => self.release,
        }
    }
}

fn validate_event_order(events: &EventTimes) -> std::result::Result<(), ValidationError> {
    if events.foot_plant < events.max_external_rotation
        && events.max_external_rotation < events.release
    {
        Ok(())
    } else {
        Err(ValidationError::new("events_out_of_order"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReportConfig {
    #[validate(length(min = 1))]
    pub player_name: String,
    /// Report date text; today's date when absent
    pub date: Option<String>,
    #[validate(length(min = 1))]
    pub velocity_range: String,
    pub output: PathBuf,
    /// POI metrics CSV; the built-in sample session when absent
    pub csv: Option<PathBuf>,
    /// Apply the cohort filter to CSV input
    pub apply_filter: bool,
    #[validate]
    pub events: EventTimes,
    pub filter: PoiFilter,
    pub columns: ColumnMap,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            player_name: "Luke Coats".to_string(),
            date: None,
            velocity_range: "90mph - 92mph".to_string(),
            output: PathBuf::from("mocap_report.pdf"),
            csv: None,
            apply_filter: true,
            events: EventTimes::default(),
            filter: PoiFilter::default(),
            columns: ColumnMap::default(),
        }
    }
}

impl ReportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        debug!("Loaded report config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // an empty document deserializes as unit, not as an empty map
        let config: ReportConfig = if text.trim().is_empty() {
            ReportConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.check()?;
        Ok(config)
    }

    /// Field rules, cohort bounds and column mapping keys.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        self.filter.check()?;
        self.columns.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.player_name, "Luke Coats");
        assert_eq!(config.events.time(Phase::Release), 0.85);
        assert!(config.check().is_ok());
        assert_eq!(ReportConfig::from_yaml("").unwrap(), config);
    }

    #[test]
    fn test_partial_yaml() {
        let config = ReportConfig::from_yaml(
            "player_name: Sam Reyes\nevents: { fp: 0.4, mer: 0.6, rel: 0.8 }\n",
        )
        .unwrap();
        assert_eq!(config.player_name, "Sam Reyes");
        assert_eq!(config.events.foot_plant, 0.4);
        assert_eq!(config.velocity_range, "90mph - 92mph");
    }

    #[test]
    fn test_event_rules() {
        let out_of_order = "events: { fp: 0.7, mer: 0.5, rel: 0.85 }";
        assert!(matches!(
            ReportConfig::from_yaml(out_of_order),
            Err(CoreError::InvalidConfig(_))
        ));
        let out_of_range = "events: { fp: 0.5, mer: 0.7, rel: 1.5 }";
        assert!(ReportConfig::from_yaml(out_of_range).is_err());
    }

    #[test]
    fn test_empty_player_rejected() {
        assert!(ReportConfig::from_yaml("player_name: ''").is_err());
    }

    #[test]
    fn test_bad_column_key_rejected() {
        let yaml = "columns:\n  bat_speed: bat_speed_mph\n";
        assert!(matches!(
            ReportConfig::from_yaml(yaml),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            ReportConfig::from_yaml("player_name: [unclosed"),
            Err(CoreError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "velocity_range: 85mph - 87mph")?;
        writeln!(file, "apply_filter: false")?;
        let config = ReportConfig::load(file.path())?;
        assert_eq!(config.velocity_range, "85mph - 87mph");
        assert!(!config.apply_filter);
        Ok(())
    }
}
