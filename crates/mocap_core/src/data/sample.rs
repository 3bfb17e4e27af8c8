//! Built-in sample session: five right-handed fastballs, 90-92 mph.
//!
//! Used when no CSV is given, so the report is always derived from trial
//! data through the same statistics pipeline.

use crate::data::trials::TrialTable;
use crate::error::Result;

const SAMPLE_PITCHES: usize = 5;

const SAMPLE_COLUMNS: &[(&str, [f64; SAMPLE_PITCHES])] = &[
    ("pitch_speed_mph", [90.0, 91.0, 92.0, 91.0, 90.0]),
    ("arm_slot", [62.0, 59.2, 64.8, 62.0, 62.0]),
    // Shoulder
    ("shoulder_horizontal_abduction_fp", [-44.0, -45.0, -43.0, -44.0, -44.0]),
    ("shoulder_horizontal_abduction_mer", [-4.0, -6.0, -2.0, -4.0, -4.0]),
    ("shoulder_horizontal_abduction_rel", [1.0, 0.0, 2.0, 1.0, 1.0]),
    ("shoulder_abduction_fp", [91.0, 89.0, 93.0, 91.0, 91.0]),
    ("shoulder_abduction_mer", [102.0, 101.4, 102.6, 102.0, 102.0]),
    ("shoulder_abduction_rel", [99.0, 98.0, 100.0, 99.0, 99.0]),
    ("shoulder_external_rotation_fp", [48.0, 44.0, 52.0, 48.0, 48.0]),
    ("shoulder_external_rotation_mer", [193.0, 192.0, 194.0, 193.0, 193.0]),
    ("shoulder_external_rotation_rel", [123.0, 120.0, 126.0, 123.0, 123.0]),
    // Elbow
    ("elbow_flexion_fp", [113.0, 112.0, 114.0, 113.0, 113.0]),
    ("elbow_flexion_mer", [86.0, 85.0, 87.0, 86.0, 86.0]),
    ("elbow_flexion_rel", [30.0, 29.0, 31.0, 30.0, 30.0]),
    // Trunk
    ("trunk_forward_tilt_fp", [13.0, 12.0, 14.0, 13.0, 13.0]),
    ("trunk_forward_tilt_mer", [33.0, 32.0, 34.0, 33.0, 33.0]),
    ("trunk_forward_tilt_rel", [48.0, 47.0, 49.0, 48.0, 48.0]),
    ("trunk_lateral_tilt_fp", [4.0, 2.9, 5.1, 4.0, 4.0]),
    ("trunk_lateral_tilt_mer", [15.0, 14.3, 15.7, 15.0, 15.0]),
    ("trunk_lateral_tilt_rel", [8.0, 7.3, 8.7, 8.0, 8.0]),
    ("trunk_rotation_fp", [109.0, 107.0, 111.0, 109.0, 109.0]),
    ("trunk_rotation_mer", [-6.0, -6.8, -5.2, -6.0, -6.0]),
    ("trunk_rotation_rel", [-20.0, -20.7, -19.3, -20.0, -20.0]),
    // Hip-shoulder separation
    ("hip_shoulder_separation_fp", [51.0, 49.0, 53.0, 51.0, 51.0]),
    ("hip_shoulder_separation_mer", [11.0, 9.0, 13.0, 11.0, 11.0]),
    ("hip_shoulder_separation_rel", [6.0, 3.0, 9.0, 6.0, 6.0]),
    // Pelvis
    ("pelvic_forward_tilt_fp", [7.0, 6.4, 7.6, 7.0, 7.0]),
    ("pelvic_forward_tilt_mer", [45.0, 44.0, 46.0, 45.0, 45.0]),
    ("pelvic_forward_tilt_rel", [55.0, 53.0, 57.0, 55.0, 55.0]),
    ("pelvic_lateral_tilt_fp", [6.0, 3.2, 8.8, 6.0, 6.0]),
    ("pelvic_lateral_tilt_mer", [2.0, 0.6, 3.4, 2.0, 2.0]),
    ("pelvic_lateral_tilt_rel", [-5.0, -7.8, -2.2, -5.0, -5.0]),
    ("pelvic_rotation_fp", [57.0, 54.0, 60.0, 57.0, 57.0]),
    ("pelvic_rotation_mer", [-9.0, -11.0, -7.0, -9.0, -9.0]),
    ("pelvic_rotation_rel", [-11.0, -13.0, -9.0, -11.0, -11.0]),
    // Lead knee
    ("knee_flexion_fp", [61.0, 59.0, 63.0, 61.0, 61.0]),
    ("knee_flexion_mer", [58.0, 54.0, 62.0, 58.0, 58.0]),
    ("knee_flexion_rel", [48.0, 45.0, 51.0, 48.0, 48.0]),
    // Peak angular velocities (°/s)
    ("knee_angular_velocity", [-338.0, -392.0, -284.0, -338.0, -338.0]),
    ("pelvis_angular_velocity", [594.0, 574.0, 614.0, 594.0, 594.0]),
    ("trunk_angular_velocity", [1060.0, 1027.0, 1093.0, 1060.0, 1060.0]),
    ("elbow_angular_velocity", [2209.0, 2151.0, 2267.0, 2209.0, 2209.0]),
    ("shoulder_angular_velocity", [4277.0, 4115.0, 4439.0, 4277.0, 4277.0]),
    // Throwing arm stress
    ("shoulder_force_n", [1238.0, 1145.0, 1331.0, 1238.0, 1238.0]),
    ("shoulder_force_bw", [129.0, 122.0, 136.0, 129.0, 129.0]),
    ("shoulder_horizontal_abduction_torque_nm", [235.0, 118.0, 352.0, 235.0, 235.0]),
    ("shoulder_horizontal_abduction_torque_bwh", [9.0, 7.6, 10.4, 9.0, 9.0]),
    ("shoulder_internal_rotation_torque_nm", [236.0, 215.0, 257.0, 236.0, 236.0]),
    ("shoulder_internal_rotation_torque_bwh", [7.0, 6.0, 8.0, 7.0, 7.0]),
    ("elbow_torque_nm", [130.0, 114.0, 146.0, 130.0, 130.0]),
    ("elbow_torque_bwh", [6.0, 6.0, 6.0, 6.0, 6.0]),
];

/// The built-in five-pitch session as a trial table.
pub fn sample_trials() -> Result<TrialTable> {
    let mut table = TrialTable::with_rows(SAMPLE_PITCHES);
    table.push_text("p_throws", vec!["R".to_string(); SAMPLE_PITCHES])?;
    for (name, values) in SAMPLE_COLUMNS {
        table.push_numeric(name, values.to_vec())?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats::{mean, sample_std};

    #[test]
    fn test_sample_shape() {
        let table = sample_trials().unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.column_names().len(), SAMPLE_COLUMNS.len() + 1);
        assert_eq!(table.column_names()[0], "p_throws");
    }

    #[test]
    fn test_sample_aggregates() {
        let table = sample_trials().unwrap();
        let ser = table.numeric("shoulder_external_rotation_mer").unwrap();
        assert_eq!(mean(ser), Some(193.0));
        let force = table.numeric("shoulder_force_bw").unwrap();
        assert_eq!(mean(force), Some(129.0));
        let elbow = table.numeric("elbow_torque_bwh").unwrap();
        assert_eq!(sample_std(elbow), Some(0.0));
    }
}
