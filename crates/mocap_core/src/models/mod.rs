pub mod metrics;
pub mod phase;
pub mod reference;

pub use metrics::{ColumnMap, MetricSample, MetricSet, ScalarSample};
pub use phase::Phase;
pub use reference::{MetricKey, ReferenceRange, ReferenceTable, ScalarMetric, REFERENCE_TABLE};
