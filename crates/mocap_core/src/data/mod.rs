//! Trial data
//!
//! - Trial tables loaded from CSV (one row per pitch)
//! - POI cohort filter (velocity band, handedness, arm slot)
//! - Built-in sample session

pub mod poi;
pub mod sample;
pub mod trials;

pub use poi::PoiFilter;
pub use sample::sample_trials;
pub use trials::TrialTable;
