//! # Skeleton Geometry
//!
//! Marker connections for the body and bat, and the fixed orthographic
//! camera used to draw capture frames in 2D.

use crate::c3d::{C3dFile, Frame};
use crate::error::{CoreError, Result};
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

pub const BODY_SEGMENTS: [(&str, &str); 13] = [
    ("LFIN", "LELB"),
    ("LELB", "LSHO"),
    ("LSHO", "C7"),
    ("C7", "RSHO"),
    ("RSHO", "RELB"),
    ("RELB", "RFIN"),
    ("C7", "T10"),
    ("T10", "LIC"),
    ("LIC", "LKNEE"),
    ("LKNEE", "LANK"),
    ("T10", "RIC"),
    ("RIC", "RKNEE"),
    ("RKNEE", "RANK"),
];

pub const BAT_SEGMENTS: [(&str, &str); 3] = [
    ("MARKER1", "MARKER2"),
    ("MARKER2", "MARKER3"),
    ("MARKER1", "MARKER3"),
];

pub const DEFAULT_FRAME_STEP: usize = 4;
pub const DEFAULT_SNAPSHOT_FRAMES: [usize; 4] = [100, 333, 370, 400];
pub const DEFAULT_TRAIL_MARKER: &str = "Marker5";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Body,
    Bat,
}

/// A drawable segment resolved to marker indices of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub kind: SegmentKind,
    pub from: usize,
    pub to: usize,
}

/// Resolve body and bat segments; pairs with an unknown label are dropped.
pub fn connections(file: &C3dFile) -> Vec<Connection> {
    let body = BODY_SEGMENTS.iter().map(|s| (SegmentKind::Body, s));
    let bat = BAT_SEGMENTS.iter().map(|s| (SegmentKind::Bat, s));
    body.chain(bat)
        .filter_map(|(kind, (a, b))| {
            Some(Connection {
                kind,
                from: file.marker_index(a)?,
                to: file.marker_index(b)?,
            })
        })
        .collect()
}

/// Orthographic view of the capture volume.
///
/// Projects world millimetres onto a unit-scaled plane: the centre of the
/// world box maps to the origin and its half-diagonal to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub world_min: Vector3<f64>,
    pub world_max: Vector3<f64>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            elevation_deg: 30.0,
            azimuth_deg: -55.0,
            world_min: Vector3::new(-1000.0, -1000.0, 0.0),
            world_max: Vector3::new(1000.0, 1000.0, 2000.0),
        }
    }
}

impl Camera {
    fn basis(&self) -> (Vector3<f64>, Vector3<f64>) {
        let el = self.elevation_deg.to_radians();
        let az = self.azimuth_deg.to_radians();
        let right = Vector3::new(-az.sin(), az.cos(), 0.0);
        let up = Vector3::new(-el.sin() * az.cos(), -el.sin() * az.sin(), el.cos());
        (right, up)
    }

    fn center(&self) -> Vector3<f64> {
        (self.world_min + self.world_max) / 2.0
    }

    fn radius(&self) -> f64 {
        ((self.world_max - self.world_min) / 2.0).norm().max(f64::EPSILON)
    }

    pub fn project(&self, point: &Vector3<f64>) -> Vector2<f64> {
        let (right, up) = self.basis();
        let rel = point - self.center();
        Vector2::new(rel.dot(&right), rel.dot(&up)) / self.radius()
    }

    /// Projected outline of the world box floor (z = world_min.z).
    pub fn floor(&self) -> [Vector2<f64>; 4] {
        let (lo, hi) = (self.world_min, self.world_max);
        [
            self.project(&Vector3::new(lo.x, lo.y, lo.z)),
            self.project(&Vector3::new(hi.x, lo.y, lo.z)),
            self.project(&Vector3::new(hi.x, hi.y, lo.z)),
            self.project(&Vector3::new(lo.x, hi.y, lo.z)),
        ]
    }
}

/// A frame projected to the view plane.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFrame {
    pub index: usize,
    pub markers: Vec<Option<Vector2<f64>>>,
    pub segments: Vec<(SegmentKind, Vector2<f64>, Vector2<f64>)>,
}

pub fn project_frame(
    camera: &Camera,
    frame: &Frame,
    index: usize,
    connections: &[Connection],
) -> ProjectedFrame {
    let markers: Vec<Option<Vector2<f64>>> =
        frame.iter().map(|p| p.map(|p| camera.project(&p))).collect();
    let segments = connections
        .iter()
        .filter_map(|c| {
            let a = (*markers.get(c.from)?)?;
            let b = (*markers.get(c.to)?)?;
            Some((c.kind, a, b))
        })
        .collect();
    ProjectedFrame {
        index,
        markers,
        segments,
    }
}

/// 0-based frame indices sampled every `step` frames, starting at frame 0.
///
/// The last frame is included whenever it falls on a step, so a recording of
/// `n` frames yields `ceil(n / step)` indices.
pub fn frame_indices(frame_count: usize, step: usize) -> Result<Vec<usize>> {
    if step == 0 {
        return Err(CoreError::InvalidConfig(
            "frame step must be at least 1".to_string(),
        ));
    }
    Ok((0..frame_count).step_by(step).collect())
}

/// Projected path of `marker` over frames `0..until`, skipping gaps.
pub fn trail(camera: &Camera, file: &C3dFile, marker: usize, until: usize) -> Vec<Vector2<f64>> {
    file.trajectory(marker, 0..until)
        .into_iter()
        .flatten()
        .map(|p| camera.project(&p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c3d::C3dWriter;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_center_projects_to_origin() {
        let camera = Camera::default();
        let p = camera.project(&Vector3::new(0.0, 0.0, 1000.0));
        assert!(close(p.x, 0.0) && close(p.y, 0.0));
    }

    #[test]
    fn test_vertical_maps_up() {
        let camera = Camera::default();
        let top = camera.project(&Vector3::new(0.0, 0.0, 2000.0));
        assert!(close(top.x, 0.0));
        let expected = 1000.0 * 30f64.to_radians().cos() / 3_000_000f64.sqrt();
        assert!(close(top.y, expected));
    }

    #[test]
    fn test_box_corners_within_unit_circle() {
        let camera = Camera::default();
        for x in [-1000.0, 1000.0] {
            for y in [-1000.0, 1000.0] {
                for z in [0.0, 2000.0] {
                    assert!(camera.project(&Vector3::new(x, y, z)).norm() <= 1.0 + 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_frame_indices() {
        assert_eq!(frame_indices(10, 4).unwrap(), vec![0, 4, 8]);
        assert_eq!(frame_indices(8, 4).unwrap().len(), 2);
        assert!(frame_indices(0, 4).unwrap().is_empty());
        assert!(frame_indices(10, 0).is_err());
    }

    #[test]
    fn test_frame_indices_keep_final_frame_on_step() {
        assert_eq!(frame_indices(9, 4).unwrap(), vec![0, 4, 8]);
        assert_eq!(frame_indices(5, 1).unwrap().last(), Some(&4));
        for (count, step) in [(21, 4), (400, 4), (7, 7), (3, 5)] {
            assert_eq!(frame_indices(count, step).unwrap().len(), count.div_ceil(step));
        }
    }

    #[test]
    fn test_connections_skip_missing_markers() {
        let mut writer = C3dWriter::new(["C7", "LSHO", "RSHO", "MARKER1", "MARKER2"], 100.0);
        writer
            .push_frame(vec![
                Some(Vector3::new(0.0, 0.0, 1500.0)),
                Some(Vector3::new(-200.0, 0.0, 1450.0)),
                None,
                Some(Vector3::new(300.0, 0.0, 1200.0)),
                Some(Vector3::new(600.0, 0.0, 1300.0)),
            ])
            .unwrap();
        let file = C3dFile::from_bytes(&writer.to_bytes().unwrap()).unwrap();
        let conns = connections(&file);
        // LSHO-C7, C7-RSHO, MARKER1-MARKER2
        assert_eq!(conns.len(), 3);
        assert_eq!(conns.iter().filter(|c| c.kind == SegmentKind::Bat).count(), 1);

        let projected = project_frame(&Camera::default(), file.frame(0).unwrap(), 0, &conns);
        // RSHO is missing in this frame
        assert_eq!(projected.segments.len(), 2);
        assert!(projected.markers[2].is_none());
    }
}
