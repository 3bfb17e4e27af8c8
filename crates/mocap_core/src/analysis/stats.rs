//! # Descriptive Statistics
//!
//! Mean and sample standard deviation over repeated trials.
//! Missing measurements are stored as NaN; non-finite values are skipped.

use crate::data::trials::TrialTable;
use serde::{Deserialize, Serialize};

/// Mean of the finite values, `None` if there are none.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sample standard deviation of the finite values (n - 1 denominator),
/// `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    let m = mean(&finite)?;
    let sum_sq: f64 = finite.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (finite.len() - 1) as f64).sqrt())
}

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Column name
    pub column: String,
    /// Number of finite values
    pub count: usize,
    /// Mean (NaN when the column is empty)
    pub mean: f64,
    /// Sample std dev (absent below two values)
    pub std: Option<f64>,
}

impl ColumnStats {
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        Self {
            column: column.to_string(),
            count: values.iter().filter(|v| v.is_finite()).count(),
            mean: mean(values).unwrap_or(f64::NAN),
            std: sample_std(values),
        }
    }
}

/// Summarize every numeric column of a trial table, in column order.
pub fn describe(table: &TrialTable) -> Vec<ColumnStats> {
    table
        .numeric_columns()
        .map(|(name, values)| ColumnStats::from_values(name, values))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_skips_nan() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), Some(2.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[f64::NAN]), None);
    }

    #[test]
    fn test_infinite_values_are_skipped() {
        let values = [2.0, f64::INFINITY, 4.0, f64::NEG_INFINITY];
        assert_eq!(mean(&values), Some(3.0));
        assert!((sample_std(&values).unwrap() - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(mean(&[f64::INFINITY]), None);

        let stats = ColumnStats::from_values("x", &values);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 3.0);
    }

    #[test]
    fn test_sample_std() {
        let std = sample_std(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((std - 1.290_994_448_7).abs() < 1e-9);
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(sample_std(&[6.0, 6.0, 6.0]), Some(0.0));
    }

    #[test]
    fn test_describe_numeric_only() {
        let csv = "p_throws,pitch_speed_mph,arm_slot\nR,90,62\nR,92,60\n";
        let table = TrialTable::from_reader(csv.as_bytes()).unwrap();
        let stats = describe(&table);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].column, "pitch_speed_mph");
        assert_eq!(stats[0].mean, 91.0);
        assert_eq!(stats[1].count, 2);
    }
}
