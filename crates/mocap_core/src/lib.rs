//! # mocap_core - Pitching Biomechanics Metrics
//!
//! Data side of the mocap report toolkit: trial tables, metric
//! aggregation, reference ranges and range classification, plus C3D
//! motion-capture reading and skeleton projection.
//!
//! ## Features
//! - IN / NEAR / OUT of range classification against MLB reference ranges
//! - POI cohort filtering and per-column mean / std dev
//! - C3D reader (Intel, DEC, MIPS; integer and float data)
//! - Orthographic skeleton projection for flipbooks and snapshot sheets

pub mod analysis;
pub mod c3d;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod series;
pub mod skeleton;

pub use analysis::{classify, ArmSlotCategory, Classification, Segment, SequenceTiming};
pub use c3d::{C3dFile, C3dWriter};
pub use config::{EventTimes, ReportConfig};
pub use data::{sample_trials, PoiFilter, TrialTable};
pub use error::{CoreError, Result};
pub use models::{
    ColumnMap, MetricKey, MetricSample, MetricSet, Phase, ReferenceRange, ReferenceTable,
    ScalarMetric, REFERENCE_TABLE,
};
pub use series::{representative, Signal, TimeSeries};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
