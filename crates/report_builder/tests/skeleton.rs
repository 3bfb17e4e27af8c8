//! Skeleton renderings from a C3D file on disk

use anyhow::Result;
use lopdf::Document;
use mocap_core::skeleton::DEFAULT_TRAIL_MARKER;
use mocap_core::{C3dFile, C3dWriter};
use nalgebra::Vector3;
use report_builder::{render_flipbook, render_snapshots};
use std::path::Path;
use tempfile::tempdir;

const LABELS: [&str; 10] = [
    "C7", "T10", "LSHO", "RSHO", "RELB", "RFIN", "MARKER1", "MARKER2", "MARKER3", "Marker5",
];

fn write_capture(path: &Path, frames: usize) -> Result<()> {
    let mut writer = C3dWriter::new(LABELS, 360.0);
    for i in 0..frames {
        let swing = (i as f64 / frames as f64) * std::f64::consts::PI;
        let hand = Vector3::new(400.0 * swing.cos(), 400.0 * swing.sin(), 1300.0);
        writer.push_frame(vec![
            Some(Vector3::new(0.0, 0.0, 1500.0)),
            Some(Vector3::new(0.0, 0.0, 1150.0)),
            Some(Vector3::new(-180.0, 0.0, 1450.0)),
            Some(Vector3::new(180.0, 0.0, 1450.0)),
            Some(Vector3::new(300.0, 50.0, 1350.0)),
            Some(hand),
            Some(hand + Vector3::new(50.0, 0.0, 0.0)),
            Some(hand + Vector3::new(400.0, 0.0, 100.0)),
            Some(hand + Vector3::new(800.0, 0.0, 200.0)),
            Some(hand + Vector3::new(750.0, 0.0, 190.0)),
        ])?;
    }
    writer.write(path)?;
    Ok(())
}

#[test]
fn test_flipbook_page_count_is_ceil_of_frames_over_step() -> Result<()> {
    let dir = tempdir()?;
    let c3d = dir.path().join("swing.c3d");
    write_capture(&c3d, 21)?;
    let file = C3dFile::open(&c3d)?;
    assert_eq!(file.frame_count(), 21);

    for step in [1, 4, 5, 21, 40] {
        let output = dir.path().join(format!("flipbook_{}.pdf", step));
        let meta = render_flipbook(&file, &output, step)?;
        let expected = 21usize.div_ceil(step);
        assert_eq!(meta.pdf.page_count, expected, "step {}", step);
        assert_eq!(Document::load(&output)?.get_pages().len(), expected);
    }
    Ok(())
}

#[test]
fn test_snapshot_sheet_with_trail() -> Result<()> {
    let dir = tempdir()?;
    let c3d = dir.path().join("swing.c3d");
    write_capture(&c3d, 50)?;
    let file = C3dFile::open(&c3d)?;

    let output = dir.path().join("sheet/snapshots.pdf");
    let meta = render_snapshots(&file, &output, &[0, 10, 25, 49], DEFAULT_TRAIL_MARKER)?;
    assert_eq!(meta.frames, vec![0, 10, 25, 49]);
    assert_eq!(Document::load(&output)?.get_pages().len(), 1);
    Ok(())
}

#[test]
fn test_snapshot_frame_beyond_capture_fails() -> Result<()> {
    let dir = tempdir()?;
    let c3d = dir.path().join("swing.c3d");
    write_capture(&c3d, 50)?;
    let file = C3dFile::open(&c3d)?;

    let output = dir.path().join("snapshots.pdf");
    assert!(render_snapshots(&file, &output, &[100, 333, 370, 400], DEFAULT_TRAIL_MARKER).is_err());
    assert!(!output.exists());
    Ok(())
}
