//! # C3D Reader
//!
//! Motion-capture files in the C3D container: 512-byte blocks holding a
//! header, a parameter section and the 3D point data (integer or float,
//! Intel / DEC / MIPS byte order).
//!
//! Points are stored per frame as `Option<Vector3<f64>>` in millimetres;
//! `None` marks a point with a negative residual. Analog samples are
//! skipped over.

mod bytes;
mod header;
mod params;
mod writer;

pub use bytes::Processor;
pub use header::{Header, BLOCK_SIZE};
pub use params::{Group, ParamData, Parameter, ParameterSet};
pub use writer::C3dWriter;

use crate::error::{CoreError, Result};
use bytes::ByteReader;
use nalgebra::Vector3;
use serde::Serialize;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info, warn};

/// One frame: a position per point label, `None` when missing.
pub type Frame = Vec<Option<Vector3<f64>>>;

#[derive(Debug, Clone)]
pub struct C3dFile {
    pub header: Header,
    pub processor: Processor,
    pub parameters: ParameterSet,
    labels: Vec<String>,
    frames: Vec<Frame>,
}

/// Overview printed by `c3d-info`.
#[derive(Debug, Clone, Serialize)]
pub struct C3dSummary {
    pub processor: Processor,
    pub point_count: usize,
    pub frame_count: usize,
    pub first_frame: u16,
    pub last_frame: u16,
    pub frame_rate: f32,
    pub float_data: bool,
    pub analog_per_frame: u16,
    pub labels: Vec<String>,
    pub groups: Vec<String>,
}

impl C3dFile {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file = Self::from_bytes(&bytes)?;
        info!(
            "Loaded {}: {} markers, {} frames at {} Hz",
            path.display(),
            file.point_count(),
            file.frame_count(),
            file.frame_rate()
        );
        Ok(file)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let processor = Header::processor(bytes)?;
        let header = Header::parse(bytes, processor)?;
        let parameters = ParameterSet::parse(bytes, header.parameter_block, processor)?;

        let point_count = parameters
            .get("POINT", "USED")
            .and_then(Parameter::first_int)
            .map(|n| n as u16 as usize)
            .unwrap_or(header.point_count as usize);
        let scale = parameters
            .get("POINT", "SCALE")
            .and_then(Parameter::first_float)
            .unwrap_or(header.scale);
        let data_start = parameters
            .get("POINT", "DATA_START")
            .and_then(Parameter::first_int)
            .filter(|&block| block > 0)
            .map(|block| block as u16)
            .unwrap_or(header.data_start);

        let mut labels: Vec<String> = ["LABELS", "LABELS2", "LABELS3"]
            .iter()
            .filter_map(|name| parameters.get("POINT", name))
            .flat_map(|p| p.strings())
            .collect();
        if labels.len() < point_count {
            warn!(
                "{} labels for {} points; naming the rest by index",
                labels.len(),
                point_count
            );
            labels.extend((labels.len()..point_count).map(|i| format!("POINT{}", i + 1)));
        }
        labels.truncate(point_count);

        let frames = read_points(
            bytes,
            processor,
            &header,
            data_start,
            point_count,
            scale,
        )?;

        Ok(Self {
            header,
            processor,
            parameters,
            labels,
            frames,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn point_count(&self) -> usize {
        self.labels.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_rate(&self) -> f32 {
        self.parameters
            .get("POINT", "RATE")
            .and_then(Parameter::first_float)
            .unwrap_or(self.header.frame_rate)
    }

    pub fn parameter(&self, group: &str, name: &str) -> Option<&Parameter> {
        self.parameters.get(group, name)
    }

    /// Index of a marker label; exact match first, then case-insensitive.
    pub fn marker_index(&self, label: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .or_else(|| self.labels.iter().position(|l| l.eq_ignore_ascii_case(label)))
    }

    pub fn require_marker(&self, label: &str) -> Result<usize> {
        self.marker_index(label)
            .ok_or_else(|| CoreError::UnknownMarker(label.to_string()))
    }

    /// Points of a 0-based frame index.
    pub fn frame(&self, index: usize) -> Result<&Frame> {
        self.frames.get(index).ok_or(CoreError::FrameOutOfRange {
            frame: index,
            first: 0,
            last: self.frames.len().saturating_sub(1),
        })
    }

    pub fn point(&self, frame: usize, marker: usize) -> Option<Vector3<f64>> {
        self.frames.get(frame)?.get(marker).copied().flatten()
    }

    /// Positions of one marker over a frame range (clamped to the data).
    pub fn trajectory(&self, marker: usize, frames: Range<usize>) -> Vec<Option<Vector3<f64>>> {
        let end = frames.end.min(self.frames.len());
        let start = frames.start.min(end);
        self.frames[start..end]
            .iter()
            .map(|f| f.get(marker).copied().flatten())
            .collect()
    }

    pub fn summary(&self) -> C3dSummary {
        C3dSummary {
            processor: self.processor,
            point_count: self.point_count(),
            frame_count: self.frame_count(),
            first_frame: self.header.first_frame,
            last_frame: self.header.last_frame,
            frame_rate: self.frame_rate(),
            float_data: self.header.is_float(),
            analog_per_frame: self.header.analog_per_frame,
            labels: self.labels.clone(),
            groups: self
                .parameters
                .groups
                .iter()
                .map(|g| g.name.clone())
                .collect(),
        }
    }
}

fn read_points(
    bytes: &[u8],
    processor: Processor,
    header: &Header,
    data_start: u16,
    point_count: usize,
    scale: f32,
) -> Result<Vec<Frame>> {
    if data_start == 0 {
        return Err(CoreError::C3d("data start block is 0".to_string()));
    }
    let float = scale < 0.0;
    let scale = scale.abs() as f64;
    let analog_bytes = header.analog_per_frame as usize * if float { 4 } else { 2 };
    let frame_count = header.frame_count();

    let mut r = ByteReader::new(bytes, (data_start as usize - 1) * BLOCK_SIZE, processor);
    let mut frames = Vec::with_capacity(frame_count);
    for _ in 0..frame_count {
        let mut frame = Vec::with_capacity(point_count);
        for _ in 0..point_count {
            let point = if float {
                let (x, y, z, residual) = (r.f32()?, r.f32()?, r.f32()?, r.f32()?);
                (residual >= 0.0).then(|| Vector3::new(x as f64, y as f64, z as f64))
            } else {
                let (x, y, z, residual) = (r.i16()?, r.i16()?, r.i16()?, r.i16()?);
                (residual >= 0).then(|| {
                    Vector3::new(x as f64 * scale, y as f64 * scale, z as f64 * scale)
                })
            };
            frame.push(point);
        }
        r.skip(analog_bytes)?;
        frames.push(frame);
    }
    debug!(
        "Read {} frames of {} points ({} data)",
        frames.len(),
        point_count,
        if float { "float" } else { "integer" }
    );
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic() -> C3dWriter {
        let mut writer = C3dWriter::new(["C7", "LSHO", "Marker5"], 300.0);
        for i in 0..6 {
            let t = i as f64;
            writer
                .push_frame(vec![
                    Some(Vector3::new(0.0, 0.0, 1500.0 + t)),
                    if i == 2 {
                        None
                    } else {
                        Some(Vector3::new(-200.0, 10.0 * t, 1450.0))
                    },
                    Some(Vector3::new(100.0 * t, -50.0, 1000.0)),
                ])
                .unwrap();
        }
        writer
    }

    #[test]
    fn test_round_trip() {
        let bytes = synthetic().to_bytes().unwrap();
        let file = C3dFile::from_bytes(&bytes).unwrap();
        assert_eq!(file.processor, Processor::Intel);
        assert_eq!(file.labels(), &["C7", "LSHO", "Marker5"]);
        assert_eq!(file.frame_count(), 6);
        assert_eq!(file.frame_rate(), 300.0);
        assert!(file.header.is_float());
        assert_eq!(file.point(3, 0), Some(Vector3::new(0.0, 0.0, 1503.0)));
        assert_eq!(file.point(2, 1), None);
        assert_eq!(file.point(4, 1), Some(Vector3::new(-200.0, 40.0, 1450.0)));
    }

    #[test]
    fn test_analog_samples_skipped() {
        let bytes = synthetic().with_analog(10).to_bytes().unwrap();
        let file = C3dFile::from_bytes(&bytes).unwrap();
        assert_eq!(file.header.analog_per_frame, 10);
        assert_eq!(file.point(5, 2), Some(Vector3::new(500.0, -50.0, 1000.0)));
    }

    #[test]
    fn test_parameters() {
        let file = C3dFile::from_bytes(&synthetic().to_bytes().unwrap()).unwrap();
        let used = file.parameter("point", "used").unwrap();
        assert_eq!(used.first_int(), Some(3));
        assert!(file.parameters.group("ANALOG").is_some());
        assert_eq!(file.summary().groups, vec!["POINT", "ANALOG"]);
    }

    #[test]
    fn test_marker_lookup() {
        let file = C3dFile::from_bytes(&synthetic().to_bytes().unwrap()).unwrap();
        assert_eq!(file.marker_index("Marker5"), Some(2));
        assert_eq!(file.marker_index("MARKER5"), Some(2));
        assert!(matches!(
            file.require_marker("RFIN"),
            Err(CoreError::UnknownMarker(_))
        ));
    }

    #[test]
    fn test_frame_bounds_and_trajectory() {
        let file = C3dFile::from_bytes(&synthetic().to_bytes().unwrap()).unwrap();
        assert!(matches!(
            file.frame(6),
            Err(CoreError::FrameOutOfRange { frame: 6, first: 0, last: 5 })
        ));
        let trail = file.trajectory(2, 0..3);
        assert_eq!(trail.len(), 3);
        assert_eq!(trail[1], Some(Vector3::new(100.0, -50.0, 1000.0)));
        assert_eq!(file.trajectory(2, 4..100).len(), 2);
    }

    #[test]
    fn test_integer_data() {
        let mut bytes = C3dWriter::new(["A"], 100.0).to_bytes().unwrap();
        // switch to integer data with scale 0.5 and append one frame
        bytes[12..16].copy_from_slice(&0.5f32.to_le_bytes());
        bytes[8..10].copy_from_slice(&1u16.to_le_bytes());
        let param_scale = find(&bytes, b"SCALE").unwrap() + 5 + 2 + 2;
        bytes[param_scale..param_scale + 4].copy_from_slice(&0.5f32.to_le_bytes());
        for v in [10i16, -20, 30, 0] {
            bytes.extend(v.to_le_bytes());
        }
        let file = C3dFile::from_bytes(&bytes).unwrap();
        assert!(!file.header.is_float());
        assert_eq!(file.point(0, 0), Some(Vector3::new(5.0, -10.0, 15.0)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            C3dFile::from_bytes(&[0u8; 100]),
            Err(CoreError::C3d(_))
        ));
        let mut bytes = vec![0u8; 1024];
        bytes[0] = 2;
        bytes[1] = 0x50;
        bytes[512 + 3] = 99;
        assert!(C3dFile::from_bytes(&bytes).is_err());
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }
}
