//! Kinematic sequence timing.
//!
//! An efficient pitch accelerates proximal to distal: pelvis, trunk, elbow,
//! then shoulder reach peak angular velocity one after another.

use crate::models::reference::ScalarMetric;
use crate::series::{representative, Signal, TimeSeries};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Pelvis,
    Trunk,
    Elbow,
    Shoulder,
}

impl Segment {
    /// Ideal proximal-to-distal order.
    pub const ALL: [Segment; 4] = [
        Segment::Pelvis,
        Segment::Trunk,
        Segment::Elbow,
        Segment::Shoulder,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Segment::Pelvis => "Pelvis",
            Segment::Trunk => "Trunk",
            Segment::Elbow => "Elbow",
            Segment::Shoulder => "Shoulder",
        }
    }

    /// Peak angular velocity metric of the segment.
    pub fn metric(&self) -> ScalarMetric {
        match self {
            Segment::Pelvis => ScalarMetric::PelvisAngularVelocity,
            Segment::Trunk => ScalarMetric::TrunkAngularVelocity,
            Segment::Elbow => ScalarMetric::ElbowAngularVelocity,
            Segment::Shoulder => ScalarMetric::ShoulderAngularVelocity,
        }
    }

    /// Line color (hex) on the kinematic sequence chart.
    pub fn color_hex(&self) -> &'static str {
        match self {
            Segment::Pelvis => "#FF0000",
            Segment::Trunk => "#008000",
            Segment::Elbow => "#0000FF",
            Segment::Shoulder => "#FFA500",
        }
    }
}

/// Time of peak angular velocity for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentPeak {
    pub segment: Segment,
    pub time: f64,
    pub value: f64,
}

/// Segments ordered by time of peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceTiming {
    peaks: Vec<SegmentPeak>,
}

impl SequenceTiming {
    /// Order segments by the time of their series' maximum.
    ///
    /// Segments with an empty series are left out. Ties keep the
    /// proximal-to-distal order.
    pub fn from_series<'a, I>(series: I) -> Self
    where
        I: IntoIterator<Item = (Segment, &'a TimeSeries)>,
    {
        let mut peaks: Vec<SegmentPeak> = series
            .into_iter()
            .filter_map(|(segment, s)| {
                s.peak().map(|(time, value)| SegmentPeak {
                    segment,
                    time,
                    value,
                })
            })
            .collect();
        peaks.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.segment.cmp(&b.segment)));
        Self { peaks }
    }

    /// Timing of the representative angular-velocity curves.
    pub fn representative() -> Self {
        let series: Vec<(Segment, TimeSeries)> = Segment::ALL
            .iter()
            .map(|&segment| (segment, representative(Signal::AngularVelocity(segment))))
            .collect();
        Self::from_series(series.iter().map(|(segment, s)| (*segment, s)))
    }

    pub fn peaks(&self) -> &[SegmentPeak] {
        &self.peaks
    }

    pub fn order(&self) -> Vec<Segment> {
        self.peaks.iter().map(|p| p.segment).collect()
    }

    /// 1-based position of a segment in the observed order.
    pub fn rank(&self, segment: Segment) -> Option<usize> {
        self.peaks
            .iter()
            .position(|p| p.segment == segment)
            .map(|i| i + 1)
    }

    pub fn is_on_time(&self) -> bool {
        self.order() == Segment::ALL
    }

    pub fn verdict(&self) -> &'static str {
        if self.is_on_time() {
            "On Time"
        } else {
            "Out of Sequence"
        }
    }

    /// "Pelvis → Trunk → Elbow → Shoulder"
    pub fn describe(&self) -> String {
        self.peaks
            .iter()
            .map(|p| p.segment.name())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representative_is_on_time() {
        let timing = SequenceTiming::representative();
        assert_eq!(timing.order(), Segment::ALL.to_vec());
        assert!(timing.is_on_time());
        assert_eq!(timing.verdict(), "On Time");
        assert_eq!(timing.rank(Segment::Elbow), Some(3));
        assert_eq!(timing.describe(), "Pelvis → Trunk → Elbow → Shoulder");
    }

    #[test]
    fn test_out_of_sequence() {
        let early = TimeSeries::from_fn(10, 0.0, |t| -(t - 0.2).powi(2));
        let late = TimeSeries::from_fn(10, 0.0, |t| -(t - 0.8).powi(2));
        let timing = SequenceTiming::from_series([
            (Segment::Pelvis, &late),
            (Segment::Trunk, &early),
            (Segment::Elbow, &late),
            (Segment::Shoulder, &late),
        ]);
        assert_eq!(timing.order()[0], Segment::Trunk);
        // tie at 0.8 keeps proximal-to-distal order
        assert_eq!(
            timing.order()[1..],
            [Segment::Pelvis, Segment::Elbow, Segment::Shoulder]
        );
        assert_eq!(timing.verdict(), "Out of Sequence");
    }

    #[test]
    fn test_empty_series_skipped() {
        let empty = TimeSeries::from_fn(0, 0.0, |t| t);
        let timing = SequenceTiming::from_series([(Segment::Pelvis, &empty)]);
        assert!(timing.peaks().is_empty());
        assert_eq!(timing.rank(Segment::Pelvis), None);
        assert!(!timing.is_on_time());
    }
}
