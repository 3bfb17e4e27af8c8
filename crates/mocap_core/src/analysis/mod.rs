//! # Analysis Module
//!
//! Statistics and interpretation of pitching metrics.
//!
//! ## Submodules
//!
//! - `classify` - IN/NEAR/OUT of range classification
//! - `stats` - mean and sample std dev, per-column summaries
//! - `arm_slot` - arm slot categories
//! - `sequence` - kinematic sequence timing

pub mod arm_slot;
pub mod classify;
pub mod sequence;
pub mod stats;

pub use arm_slot::ArmSlotCategory;
pub use classify::{classify, Classification};
pub use sequence::{Segment, SequenceTiming};
pub use stats::{describe, ColumnStats};
