//! Minimal C3D writer: Intel processor, float point data.
//!
//! Produces files readable by [`C3dFile`](super::C3dFile) and other C3D
//! tools. Used for fixtures and for exporting synthetic captures.

use super::bytes::Processor;
use super::header::{BLOCK_SIZE, C3D_KEY};
use crate::error::{CoreError, Result};
use nalgebra::Vector3;
use std::path::Path;
use tracing::debug;

const POINT_GROUP: i8 = 1;
const ANALOG_GROUP: i8 = 2;

pub struct C3dWriter {
    labels: Vec<String>,
    frame_rate: f32,
    analog_per_frame: u16,
    frames: Vec<Vec<Option<Vector3<f64>>>>,
}

impl C3dWriter {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>, frame_rate: f32) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            frame_rate,
            analog_per_frame: 0,
            frames: Vec::new(),
        }
    }

    /// Reserve zero-filled analog samples after each frame.
    pub fn with_analog(mut self, per_frame: u16) -> Self {
        self.analog_per_frame = per_frame;
        self
    }

    /// Append one frame; `None` marks a missing point.
    pub fn push_frame(&mut self, points: Vec<Option<Vector3<f64>>>) -> Result<()> {
        if points.len() != self.labels.len() {
            return Err(CoreError::C3d(format!(
                "frame has {} points, expected {}",
                points.len(),
                self.labels.len()
            )));
        }
        self.frames.push(points);
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.labels.len() > u16::MAX as usize || self.frames.len() > u16::MAX as usize {
            return Err(CoreError::C3d(
                "too many points or frames for a C3D header".to_string(),
            ));
        }
        let width = self.labels.iter().map(|l| l.len()).max().unwrap_or(0).max(1);
        if width > u8::MAX as usize || self.labels.len() > u8::MAX as usize {
            return Err(CoreError::C3d(
                "labels do not fit a single LABELS parameter".to_string(),
            ));
        }

        // Parameter section size does not depend on DATA_START's value
        let params_len = self.parameter_section(0, 0).len();
        let param_blocks = params_len.div_ceil(BLOCK_SIZE);
        let data_start = 2 + param_blocks;
        let params = self.parameter_section(param_blocks as u8, data_start as u16);

        let mut out = Vec::with_capacity(data_start * BLOCK_SIZE);
        out.extend(self.header(data_start as u16));
        out.extend(params);
        out.resize((data_start - 1) * BLOCK_SIZE, 0);

        for frame in &self.frames {
            for point in frame {
                let (xyz, residual) = match point {
                    Some(p) => ([p.x as f32, p.y as f32, p.z as f32], 0.0f32),
                    None => ([0.0; 3], -1.0),
                };
                for v in xyz {
                    out.extend(v.to_le_bytes());
                }
                out.extend(residual.to_le_bytes());
            }
            for _ in 0..self.analog_per_frame {
                out.extend(0.0f32.to_le_bytes());
            }
        }

        debug!(
            "Encoded C3D: {} points, {} frames, {} bytes",
            self.labels.len(),
            self.frames.len(),
            out.len()
        );
        Ok(out)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    fn header(&self, data_start: u16) -> Vec<u8> {
        let mut h = vec![0u8; BLOCK_SIZE];
        h[0] = 2;
        h[1] = C3D_KEY;
        let words: [(usize, u16); 7] = [
            (2, self.labels.len() as u16),
            (4, self.analog_per_frame),
            (6, 1),
            (8, self.frames.len() as u16),
            (10, 0),
            (16, data_start),
            (18, if self.analog_per_frame > 0 { 1 } else { 0 }),
        ];
        for (offset, value) in words {
            h[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        }
        h[12..16].copy_from_slice(&(-1.0f32).to_le_bytes());
        h[20..24].copy_from_slice(&self.frame_rate.to_le_bytes());
        h
    }

    fn parameter_section(&self, block_count: u8, data_start: u16) -> Vec<u8> {
        let width = self.labels.iter().map(|l| l.len()).max().unwrap_or(0).max(1);
        let mut label_bytes = Vec::with_capacity(width * self.labels.len());
        for label in &self.labels {
            let mut cell = label.as_bytes().to_vec();
            cell.resize(width, b' ');
            label_bytes.extend(cell);
        }

        let mut records: Vec<Vec<u8>> = vec![
            group_record(POINT_GROUP, "POINT", "3-D point parameters"),
            int_record(POINT_GROUP, "USED", self.labels.len() as i16),
            float_record(POINT_GROUP, "SCALE", -1.0),
            float_record(POINT_GROUP, "RATE", self.frame_rate),
            int_record(POINT_GROUP, "DATA_START", data_start as i16),
            int_record(POINT_GROUP, "FRAMES", self.frames.len() as i16),
            char_record(
                POINT_GROUP,
                "LABELS",
                &[width as u8, self.labels.len() as u8],
                &label_bytes,
            ),
            group_record(ANALOG_GROUP, "ANALOG", "Analog parameters"),
            int_record(ANALOG_GROUP, "USED", if self.analog_per_frame > 0 { 1 } else { 0 }),
        ];
        if let Some(last) = records.last_mut() {
            set_offset(last, 0);
        }

        let mut out = vec![0u8, C3D_KEY, block_count, Processor::Intel.code()];
        for record in records {
            out.extend(record);
        }
        // End-of-section marker
        out.extend([0u8, 0]);
        let padded = out.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        out.resize(padded, 0);
        out
    }
}

/// Record with its name header and the offset to the following record.
fn record(id: i8, name: &str, body: &[u8]) -> Vec<u8> {
    let mut r = vec![name.len() as u8, id as u8];
    r.extend(name.as_bytes());
    let offset = (2 + body.len()) as i16;
    r.extend(offset.to_le_bytes());
    r.extend(body);
    r
}

fn set_offset(record: &mut [u8], offset: i16) {
    let pos = 2 + record[0] as usize;
    record[pos..pos + 2].copy_from_slice(&offset.to_le_bytes());
}

fn group_record(id: i8, name: &str, description: &str) -> Vec<u8> {
    let mut body = vec![description.len() as u8];
    body.extend(description.as_bytes());
    record(-id, name, &body)
}

fn parameter_record(group: i8, name: &str, kind: i8, dims: &[u8], data: &[u8]) -> Vec<u8> {
    let mut body = vec![kind as u8, dims.len() as u8];
    body.extend(dims);
    body.extend(data);
    body.push(0);
    record(group, name, &body)
}

fn int_record(group: i8, name: &str, value: i16) -> Vec<u8> {
    parameter_record(group, name, 2, &[], &value.to_le_bytes())
}

fn float_record(group: i8, name: &str, value: f32) -> Vec<u8> {
    parameter_record(group, name, 4, &[], &value.to_le_bytes())
}

fn char_record(group: i8, name: &str, dims: &[u8], data: &[u8]) -> Vec<u8> {
    parameter_record(group, name, -1, dims, data)
}
