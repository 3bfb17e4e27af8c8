//! Per-phase metric samples aggregated from trial tables.

use crate::analysis::classify::{classify, Classification};
use crate::analysis::stats::{mean, sample_std};
use crate::data::trials::TrialTable;
use crate::error::{CoreError, Result};
use crate::models::phase::Phase;
use crate::models::reference::{format_number, MetricKey, ReferenceTable, ScalarMetric};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Mean ± std of one metric at one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub label: String,
    pub phase: Phase,
    pub mean: f64,
    /// Sample std dev across trials; 0.0 when fewer than two trials
    pub std: f64,
}

impl MetricSample {
    /// "113° ± 1°" style text.
    pub fn display(&self, unit: &str) -> String {
        format_mean_std(self.mean, self.std, unit)
    }
}

/// Mean ± std of a single-valued metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarSample {
    pub metric: ScalarMetric,
    pub mean: f64,
    pub std: f64,
}

impl ScalarSample {
    pub fn display(&self) -> String {
        format_mean_std(self.mean, self.std, self.metric.unit())
    }
}

pub fn format_mean_std(mean: f64, std: f64, unit: &str) -> String {
    format!(
        "{}{unit} ± {}{unit}",
        format_number(mean),
        format_number(std),
        unit = unit
    )
}

/// Maps metrics to trial-table column names.
///
/// Defaults to `{metric}_{fp|mer|rel}` for phase metrics and the metric key
/// for scalars. Overrides use `metric.PHASE` or the scalar key:
///
/// ```yaml
/// columns:
///   shoulder_external_rotation.MER: max_shoulder_external_rotation
///   pelvis_angular_velocity: max_pelvis_rotational_velo
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMap {
    overrides: BTreeMap<String, String>,
}

impl ColumnMap {
    pub fn with_override(mut self, key: &str, column: &str) -> Self {
        self.overrides.insert(key.to_string(), column.to_string());
        self
    }

    pub fn phase_column(&self, metric: MetricKey, phase: Phase) -> String {
        let key = format!("{}.{}", metric.key(), phase.code());
        self.overrides
            .get(&key)
            .cloned()
            .unwrap_or_else(|| format!("{}_{}", metric.key(), phase.column_suffix()))
    }

    pub fn scalar_column(&self, metric: ScalarMetric) -> String {
        self.overrides
            .get(metric.key())
            .cloned()
            .unwrap_or_else(|| metric.key().to_string())
    }

    /// Reject override keys that name no known metric or phase.
    pub fn validate(&self) -> Result<()> {
        for key in self.overrides.keys() {
            let known = match key.split_once('.') {
                Some((metric, phase)) => {
                    MetricKey::from_key(metric).is_some() && Phase::from_code(phase).is_some()
                }
                None => ScalarMetric::from_key(key).is_some(),
            };
            if !known {
                return Err(CoreError::InvalidConfig(format!(
                    "unknown column mapping key '{}'",
                    key
                )));
            }
        }
        Ok(())
    }
}

/// Every metric of a session, aggregated across trials.
#[derive(Debug, Clone, Default)]
pub struct MetricSet {
    trials: usize,
    phase_samples: HashMap<(MetricKey, Phase), MetricSample>,
    scalar_samples: HashMap<ScalarMetric, ScalarSample>,
}

impl MetricSet {
    /// Aggregate a trial table. Missing columns leave the metric absent.
    pub fn from_trials(table: &TrialTable, columns: &ColumnMap) -> Result<Self> {
        if table.is_empty() {
            return Err(CoreError::EmptyData(
                "no trials left to aggregate".to_string(),
            ));
        }

        let mut set = MetricSet {
            trials: table.len(),
            ..Self::default()
        };

        for metric in MetricKey::ALL {
            for phase in Phase::ALL {
                let column = columns.phase_column(metric, phase);
                let Some(values) = table.numeric(&column) else {
                    debug!("No column '{}' for {} {}", column, metric.key(), phase);
                    continue;
                };
                if let Some(m) = mean(values) {
                    set.phase_samples.insert(
                        (metric, phase),
                        MetricSample {
                            label: metric.label().to_string(),
                            phase,
                            mean: m,
                            std: sample_std(values).unwrap_or(0.0),
                        },
                    );
                }
            }
        }

        for metric in ScalarMetric::ALL {
            let column = columns.scalar_column(metric);
            let Some(values) = table.numeric(&column) else {
                debug!("No column '{}' for {}", column, metric.key());
                continue;
            };
            if let Some(m) = mean(values) {
                set.scalar_samples.insert(
                    metric,
                    ScalarSample {
                        metric,
                        mean: m,
                        std: sample_std(values).unwrap_or(0.0),
                    },
                );
            }
        }

        info!(
            "Aggregated {} trials into {} phase samples and {} scalar samples",
            set.trials,
            set.phase_samples.len(),
            set.scalar_samples.len()
        );
        Ok(set)
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn get(&self, metric: MetricKey, phase: Phase) -> Option<&MetricSample> {
        self.phase_samples.get(&(metric, phase))
    }

    pub fn scalar(&self, metric: ScalarMetric) -> Option<&ScalarSample> {
        self.scalar_samples.get(&metric)
    }

    /// Classification of a phase sample with its own std as the near band.
    pub fn classify_phase(
        &self,
        table: &ReferenceTable,
        metric: MetricKey,
        phase: Phase,
    ) -> Classification {
        match self.get(metric, phase) {
            Some(sample) => classify(
                sample.mean,
                table.phase_range(metric, phase),
                Some(sample.std),
            ),
            None => Classification::Unclassified,
        }
    }

    /// Classification of a scalar sample, optionally widened by its std.
    pub fn classify_scalar(
        &self,
        table: &ReferenceTable,
        metric: ScalarMetric,
        with_std: bool,
    ) -> Classification {
        match self.scalar(metric) {
            Some(sample) => classify(
                sample.mean,
                table.scalar_range(metric),
                with_std.then_some(sample.std),
            ),
            None => Classification::Unclassified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::sample_trials;
    use crate::models::reference::REFERENCE_TABLE;

    #[test]
    fn test_sample_session_aggregation() {
        let set = MetricSet::from_trials(&sample_trials().unwrap(), &ColumnMap::default()).unwrap();
        assert_eq!(set.trials(), 5);
        let ser = set
            .get(MetricKey::ShoulderExternalRotation, Phase::MaxExternalRotation)
            .unwrap();
        assert_eq!(ser.mean, 193.0);
        assert!((ser.std - 0.707_106_78).abs() < 1e-6);
        assert_eq!(ser.display("°"), "193° ± 0.7°");
        assert_eq!(set.scalar(ScalarMetric::ElbowTorqueBwh).unwrap().std, 0.0);
    }

    #[test]
    fn test_classification_against_reference() {
        let set = MetricSet::from_trials(&sample_trials().unwrap(), &ColumnMap::default()).unwrap();
        // 193 vs [170, 188], std 0.7
        assert_eq!(
            set.classify_phase(&REFERENCE_TABLE, MetricKey::ShoulderExternalRotation, Phase::MaxExternalRotation),
            Classification::OutOfRange
        );
        assert_eq!(
            set.classify_phase(&REFERENCE_TABLE, MetricKey::ElbowFlexion, Phase::Release),
            Classification::InRange
        );
        assert_eq!(
            set.classify_phase(&REFERENCE_TABLE, MetricKey::HipShoulderSeparation, Phase::Release),
            Classification::Unclassified
        );
        assert_eq!(
            set.classify_scalar(&REFERENCE_TABLE, ScalarMetric::ShoulderForceBw, false),
            Classification::OutOfRange
        );
        assert_eq!(
            set.classify_scalar(&REFERENCE_TABLE, ScalarMetric::KneeAngularVelocity, false),
            Classification::Unclassified
        );
    }

    #[test]
    fn test_column_overrides() {
        let csv = "max_shoulder_external_rotation,max_pelvis_rotational_velo\n180,600\n186,620\n";
        let table = TrialTable::from_reader(csv.as_bytes()).unwrap();
        let columns = ColumnMap::default()
            .with_override("shoulder_external_rotation.MER", "max_shoulder_external_rotation")
            .with_override("pelvis_angular_velocity", "max_pelvis_rotational_velo");
        columns.validate().unwrap();

        let set = MetricSet::from_trials(&table, &columns).unwrap();
        assert_eq!(
            set.get(MetricKey::ShoulderExternalRotation, Phase::MaxExternalRotation)
                .unwrap()
                .mean,
            183.0
        );
        assert_eq!(set.scalar(ScalarMetric::PelvisAngularVelocity).unwrap().mean, 610.0);
        assert!(set.get(MetricKey::ElbowFlexion, Phase::FootPlant).is_none());
    }

    #[test]
    fn test_unknown_override_rejected() {
        let columns = ColumnMap::default().with_override("elbow_flexion.MKH", "x");
        assert!(columns.validate().is_err());
        let columns = ColumnMap::default().with_override("bat_speed", "x");
        assert!(columns.validate().is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        let table = TrialTable::with_rows(0);
        assert!(matches!(
            MetricSet::from_trials(&table, &ColumnMap::default()),
            Err(CoreError::EmptyData(_))
        ));
    }
}
