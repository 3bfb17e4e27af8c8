//! # Representative Time Series
//!
//! Mean curve and std band of a metric over one normalized pitch
//! (0.0 = 0.1 s before max knee height, 1.0 = 0.1 s after release).
//!
//! The profiles are fixed shapes for each signal; the report overlays them
//! with reference bands and event markers.

use crate::analysis::sequence::Segment;
use crate::models::reference::MetricKey;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Samples per representative curve.
pub const SERIES_SAMPLES: usize = 100;

/// Mean curve with a symmetric std band on a shared time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub times: Vec<f64>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl TimeSeries {
    /// Evaluate `curve` on `samples` evenly spaced points in `[0, 1]`.
    pub fn from_fn<F>(samples: usize, std: f64, curve: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let times = linspace(samples);
        let mean = times.iter().map(|&t| curve(t)).collect();
        Self {
            std: vec![std; times.len()],
            times,
            mean,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn has_band(&self) -> bool {
        self.std.iter().any(|s| *s > 0.0)
    }

    /// `(time, value)` of the maximum of the mean curve.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.times
            .iter()
            .zip(&self.mean)
            .fold(None, |best: Option<(f64, f64)>, (&t, &v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((t, v)),
            })
    }

    /// Min and max of `mean ± std`.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (m, s) in self.mean.iter().zip(&self.std) {
            lo = lo.min(m - s.abs());
            hi = hi.max(m + s.abs());
        }
        Some((lo, hi))
    }
}

/// `n` evenly spaced points from 0.0 to 1.0 inclusive.
pub fn linspace(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}

fn bell(t: f64, center: f64, width: f64) -> f64 {
    (-((t - center).powi(2)) / width).exp()
}

/// Signals drawn on report pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Angle(MetricKey),
    ShoulderForce,
    ShoulderTorque,
    ElbowTorque,
    AngularVelocity(Segment),
}

/// Representative curve for a signal.
pub fn representative(signal: Signal) -> TimeSeries {
    let n = SERIES_SAMPLES;
    match signal {
        Signal::Angle(metric) => match metric {
            MetricKey::ShoulderHorizontalAbduction => {
                TimeSeries::from_fn(n, 5.0, |t| -40.0 + 30.0 * (2.0 * PI * t).sin() + 20.0 * t)
            }
            MetricKey::ShoulderAbduction => {
                TimeSeries::from_fn(n, 8.0, |t| 60.0 + 40.0 * (PI * t).sin())
            }
            MetricKey::ShoulderExternalRotation => {
                TimeSeries::from_fn(n, 10.0, |t| 20.0 + 150.0 * t + 30.0 * (4.0 * PI * t).sin())
            }
            MetricKey::ElbowFlexion => {
                TimeSeries::from_fn(n, 5.0, |t| 120.0 - 50.0 * t + 40.0 * (2.0 * PI * t).sin())
            }
            MetricKey::TrunkForwardTilt => TimeSeries::from_fn(n, 3.0, |t| 5.0 + 45.0 * t),
            MetricKey::TrunkLateralTilt => {
                TimeSeries::from_fn(n, 4.0, |t| -5.0 + 20.0 * (1.5 * PI * t).sin())
            }
            MetricKey::TrunkRotation => TimeSeries::from_fn(n, 5.0, |t| 130.0 - 150.0 * t),
            MetricKey::PelvicForwardTilt => TimeSeries::from_fn(n, 3.0, |t| 5.0 + 55.0 * t),
            MetricKey::PelvicLateralTilt => {
                TimeSeries::from_fn(n, 3.0, |t| 5.0 - 10.0 * t + 5.0 * (2.0 * PI * t).sin())
            }
            MetricKey::PelvicRotation => TimeSeries::from_fn(n, 5.0, |t| 100.0 - 110.0 * t),
            MetricKey::HipShoulderSeparation => {
                TimeSeries::from_fn(n, 5.0, |t| 10.0 + 50.0 * bell(t, 0.5, 0.03) - 30.0 * t)
            }
            MetricKey::KneeFlexion => {
                TimeSeries::from_fn(n, 4.0, |t| 30.0 + 30.0 * (PI * t).sin() - 5.0 * t)
            }
        },
        Signal::ShoulderForce => {
            TimeSeries::from_fn(n, 50.0, |t| 200.0 + 1200.0 * bell(t, 0.7, 0.02))
        }
        Signal::ShoulderTorque => {
            TimeSeries::from_fn(n, 15.0, |t| 50.0 + 180.0 * bell(t, 0.7, 0.02))
        }
        Signal::ElbowTorque => {
            TimeSeries::from_fn(n, 10.0, |t| 20.0 + 110.0 * bell(t, 0.75, 0.015))
        }
        Signal::AngularVelocity(segment) => match segment {
            Segment::Pelvis => TimeSeries::from_fn(n, 0.0, |t| 600.0 * bell(t, 0.5, 0.02) - 200.0),
            Segment::Trunk => TimeSeries::from_fn(n, 0.0, |t| 1100.0 * bell(t, 0.6, 0.02) - 300.0),
            Segment::Elbow => {
                TimeSeries::from_fn(n, 0.0, |t| 2200.0 * bell(t, 0.7, 0.015) - 500.0)
            }
            Segment::Shoulder => {
                TimeSeries::from_fn(n, 0.0, |t| 4300.0 * bell(t, 0.8, 0.01) - 1000.0)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        let t = linspace(100);
        assert_eq!(t.len(), 100);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[99], 1.0);
        assert!(linspace(0).is_empty());
    }

    #[test]
    fn test_peak_and_bounds() {
        let series = representative(Signal::ShoulderForce);
        let (t, v) = series.peak().unwrap();
        assert!((t - 0.7).abs() < 0.02);
        assert!(v > 1350.0);
        let (lo, hi) = series.bounds().unwrap();
        assert!(lo < 200.0 && hi > v);
    }

    #[test]
    fn test_angular_velocity_has_no_band() {
        let series = representative(Signal::AngularVelocity(Segment::Trunk));
        assert!(!series.has_band());
        assert!(representative(Signal::Angle(MetricKey::TrunkRotation)).has_band());
    }

    #[test]
    fn test_every_signal_has_full_length() {
        for metric in MetricKey::ALL {
            assert_eq!(representative(Signal::Angle(metric)).len(), SERIES_SAMPLES);
        }
        for segment in Segment::ALL {
            assert_eq!(
                representative(Signal::AngularVelocity(segment)).len(),
                SERIES_SAMPLES
            );
        }
    }
}
