//! Column statistics over a POI CSV

use anyhow::Result;
use mocap_core::PoiFilter;
use report_builder::column_stats;
use std::fs;
use tempfile::tempdir;

const CSV: &str = "\
session_pitch,p_throws,pitch_speed_mph,arm_slot,max_shoulder_internal_rotational_velo
1,R,89.0,40,4500
2,R,90.0,44,4700
3,R,96.0,41,5200
4,R,92.0,50,4900
5,L,91.0,42,4400
";

#[test]
fn test_cohort_stats_serialize_to_json() -> Result<()> {
    let dir = tempdir()?;
    let csv = dir.path().join("poi_metrics.csv");
    fs::write(&csv, CSV)?;

    let stats = column_stats(&csv, Some(&PoiFilter::default()))?;
    let velo = stats
        .iter()
        .find(|s| s.column == "max_shoulder_internal_rotational_velo")
        .expect("velocity column");
    assert_eq!(velo.count, 2);
    assert_eq!(velo.mean, 4600.0);
    assert!((velo.std.unwrap_or_default() - 141.421356).abs() < 1e-4);

    // text columns are not summarized
    assert!(stats.iter().all(|s| s.column != "p_throws"));

    let json = serde_json::to_value(&stats)?;
    assert!(json.as_array().is_some_and(|a| a.len() == stats.len()));
    Ok(())
}

#[test]
fn test_unfiltered_stats_use_every_row() -> Result<()> {
    let dir = tempdir()?;
    let csv = dir.path().join("poi_metrics.csv");
    fs::write(&csv, CSV)?;

    let stats = column_stats(&csv, None)?;
    let speed = stats
        .iter()
        .find(|s| s.column == "pitch_speed_mph")
        .expect("speed column");
    assert_eq!(speed.count, 5);
    assert!((speed.mean - 91.6).abs() < 1e-9);
    Ok(())
}
