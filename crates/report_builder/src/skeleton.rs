//! # Skeleton Renderer
//!
//! Draws C3D frames through the fixed orthographic camera:
//! - flipbook: one page per sampled frame, body and bat segments
//! - snapshot sheet: one panel per chosen frame with a marker trail

use crate::chart::{draw_legend, LegendMark};
use crate::pdf::color::{
    DARK_GOLDENROD, DARK_GRAY, DARK_ORANGE, GRID_GRAY, NAVY, ROYAL_BLUE, SADDLE_BROWN,
};
use crate::pdf::{Align, Alpha, Canvas, Font, Paint, PdfDocument, TextStyle};
use crate::{write_pdf, PdfMetadata};
use anyhow::{bail, Context, Result};
use mocap_core::skeleton::{
    connections, frame_indices, project_frame, trail, Camera, ProjectedFrame, SegmentKind,
};
use mocap_core::{C3dFile, CoreError};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const FLIPBOOK_PAGE: (f64, f64) = (576.0, 432.0);
pub const SNAPSHOT_PAGE: (f64, f64) = (1008.0, 360.0);

const MARGIN: f64 = 24.0;
const PANEL_GAP: f64 = 12.0;
const TITLE_STYLE: TextStyle = TextStyle::new(Font::Bold, 12.0, NAVY);
const MARKER_RADIUS: f64 = 2.0;

/// Metadata of a written skeleton rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderMetadata {
    /// 0-based frame indices drawn, in page/panel order
    pub frames: Vec<usize>,
    #[serde(flatten)]
    pub pdf: PdfMetadata,
}

/// Square drawing area centred in a rectangle; unit-scaled camera
/// coordinates map onto its inscribed circle.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    cx: f64,
    cy: f64,
    scale: f64,
}

impl Viewport {
    fn new(x: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            cx: x + width / 2.0,
            cy: bottom + height / 2.0,
            scale: width.min(height) / 2.0 * 0.95,
        }
    }

    fn map(&self, p: &Vector2<f64>) -> (f64, f64) {
        (self.cx + p.x * self.scale, self.cy + p.y * self.scale)
    }
}

fn draw_floor(canvas: &mut Canvas, camera: &Camera, view: &Viewport) {
    let corners: Vec<(f64, f64)> = camera.floor().iter().map(|p| view.map(p)).collect();
    canvas.save();
    canvas.stroke_color(GRID_GRAY);
    canvas.line_width(0.75);
    canvas.polygon(&corners, Paint::Stroke);
    canvas.restore();
}

fn draw_segments(canvas: &mut Canvas, frame: &ProjectedFrame, view: &Viewport) {
    for (kind, a, b) in &frame.segments {
        let (color, width) = match kind {
            SegmentKind::Body => (DARK_ORANGE, 2.0),
            SegmentKind::Bat => (SADDLE_BROWN, 3.0),
        };
        let (x1, y1) = view.map(a);
        let (x2, y2) = view.map(b);
        canvas.stroke_color(color);
        canvas.line_width(width);
        canvas.line(x1, y1, x2, y2);
    }
}

fn draw_markers(canvas: &mut Canvas, frame: &ProjectedFrame, view: &Viewport) {
    canvas.save();
    canvas.alpha(Alpha::A60);
    canvas.fill_color(ROYAL_BLUE);
    for marker in frame.markers.iter().flatten() {
        let (x, y) = view.map(marker);
        canvas.circle(x, y, MARKER_RADIUS, Paint::Fill);
    }
    canvas.restore();
}

/// Render one flipbook page per sampled frame
///
/// # Arguments
///
/// * `file` - Parsed C3D recording
/// * `output` - Output PDF path
/// * `frame_step` - Draw every n-th frame (at least 1)
pub fn render_flipbook(file: &C3dFile, output: &Path, frame_step: usize) -> Result<RenderMetadata> {
    if file.frame_count() == 0 {
        return Err(CoreError::EmptyData("C3D file has no frames".to_string()).into());
    }
    let frames = frame_indices(file.frame_count(), frame_step)?;
    let camera = Camera::default();
    let conns = connections(file);
    info!(
        "Rendering {} of {} frames ({} segments)",
        frames.len(),
        file.frame_count(),
        conns.len()
    );

    let (width, height) = FLIPBOOK_PAGE;
    let view = Viewport::new(MARGIN, MARGIN, width - 2.0 * MARGIN, height - 2.0 * MARGIN - 20.0);
    let mut document = PdfDocument::new("Skeleton Flipbook", FLIPBOOK_PAGE);

    for &index in &frames {
        let projected = project_frame(&camera, file.frame(index)?, index, &conns);
        let mut canvas = Canvas::new();
        canvas.text(
            width / 2.0,
            height - MARGIN - 8.0,
            TITLE_STYLE,
            &format!("Frame {} of {}", index, file.frame_count()),
            Align::Center,
        );
        draw_floor(&mut canvas, &camera, &view);
        canvas.save();
        draw_segments(&mut canvas, &projected, &view);
        canvas.restore();
        draw_markers(&mut canvas, &projected, &view);
        draw_legend(
            &mut canvas,
            width - MARGIN - 60.0,
            height - MARGIN,
            &[
                (LegendMark::Line, DARK_ORANGE, "Body"),
                (LegendMark::Line, SADDLE_BROWN, "Bat"),
            ],
        );
        document.add_page(canvas);
    }

    let pdf = write_pdf(document, output)
        .with_context(|| format!("Failed to write flipbook: {}", output.display()))?;
    Ok(RenderMetadata { frames, pdf })
}

/// Render a single-page sheet with one panel per frame
///
/// Each panel shows the markers of its frame and the path of
/// `trail_marker` from the first frame up to it.
pub fn render_snapshots(
    file: &C3dFile,
    output: &Path,
    frames: &[usize],
    trail_marker: &str,
) -> Result<RenderMetadata> {
    if frames.is_empty() {
        bail!("No snapshot frames given");
    }
    // 1. Validate every frame and the trail marker up front
    for &f in frames {
        file.frame(f)?;
    }
    let marker = file.require_marker(trail_marker)?;

    // 2. Panel layout
    let camera = Camera::default();
    let (width, height) = SNAPSHOT_PAGE;
    let n = frames.len() as f64;
    let panel_width = (width - 2.0 * MARGIN - (n - 1.0) * PANEL_GAP) / n;
    let panel_height = height - 2.0 * MARGIN - 40.0;

    // 3. Draw panels
    let mut canvas = Canvas::new();
    let total = file.frame_count();
    for (i, &f) in frames.iter().enumerate() {
        let x = MARGIN + i as f64 * (panel_width + PANEL_GAP);
        let view = Viewport::new(x, MARGIN + 20.0, panel_width, panel_height);
        let projected = project_frame(&camera, file.frame(f)?, f, &[]);

        canvas.text(
            x + panel_width / 2.0,
            height - MARGIN - 10.0,
            TITLE_STYLE,
            &format!("Frame {} of {}", f, total),
            Align::Center,
        );
        canvas.save();
        canvas.stroke_color(GRID_GRAY);
        canvas.line_width(0.5);
        canvas.rect(x, MARGIN + 20.0, panel_width, panel_height, Paint::Stroke);
        canvas.restore();
        draw_floor(&mut canvas, &camera, &view);

        let path: Vec<(f64, f64)> = trail(&camera, file, marker, f + 1)
            .iter()
            .map(|p| view.map(p))
            .collect();
        canvas.save();
        canvas.alpha(Alpha::A50);
        canvas.stroke_color(DARK_GOLDENROD);
        canvas.line_width(1.5);
        canvas.polyline(&path);
        canvas.restore();

        draw_markers(&mut canvas, &projected, &view);
    }

    canvas.text(
        MARGIN,
        MARGIN,
        TextStyle::new(Font::Regular, 8.0, DARK_GRAY),
        &format!("Trail: {}", file.labels()[marker]),
        Align::Left,
    );
    draw_legend(
        &mut canvas,
        width - MARGIN - 90.0,
        MARGIN + 26.0,
        &[
            (LegendMark::Dot, ROYAL_BLUE, "Body Markers"),
            (LegendMark::Line, DARK_GOLDENROD, "Barrel"),
        ],
    );

    let mut document = PdfDocument::new("Skeleton Snapshots", SNAPSHOT_PAGE);
    document.add_page(canvas);
    let pdf = write_pdf(document, output)
        .with_context(|| format!("Failed to write snapshot sheet: {}", output.display()))?;
    info!("Wrote {} snapshot panels to {}", frames.len(), output.display());

    Ok(RenderMetadata {
        frames: frames.to_vec(),
        pdf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocap_core::C3dWriter;
    use nalgebra::Vector3;
    use tempfile::tempdir;

    const LABELS: [&str; 8] = [
        "C7", "T10", "LSHO", "RSHO", "MARKER1", "MARKER2", "MARKER3", "Marker5",
    ];

    fn synthetic(frames: usize) -> C3dFile {
        let mut writer = C3dWriter::new(LABELS, 240.0);
        for i in 0..frames {
            let t = i as f64 * 10.0;
            let points = vec![
                Some(Vector3::new(0.0, 0.0, 1500.0)),
                Some(Vector3::new(0.0, 0.0, 1100.0)),
                Some(Vector3::new(-180.0, 0.0, 1450.0)),
                Some(Vector3::new(180.0, 0.0, 1450.0)),
                Some(Vector3::new(300.0 + t, 100.0, 1400.0)),
                Some(Vector3::new(500.0 + t, 150.0, 1500.0)),
                if i % 3 == 0 { None } else { Some(Vector3::new(700.0, 200.0, 1600.0)) },
                Some(Vector3::new(600.0 + t, 200.0, 1550.0)),
            ];
            writer.push_frame(points).unwrap();
        }
        C3dFile::from_bytes(&writer.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_viewport_maps_origin_to_center() {
        let view = Viewport::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(view.map(&Vector2::new(0.0, 0.0)), (110.0, 70.0));
        let (x, _) = view.map(&Vector2::new(1.0, 0.0));
        assert!((x - (110.0 + 47.5)).abs() < 1e-9);
    }

    #[test]
    fn test_flipbook_page_per_sampled_frame() -> Result<()> {
        let dir = tempdir()?;
        let output = dir.path().join("flipbook.pdf");
        let meta = render_flipbook(&synthetic(10), &output, 4)?;
        assert_eq!(meta.frames, vec![0, 4, 8]);
        assert_eq!(meta.pdf.page_count, 3);
        assert!(output.exists());
        Ok(())
    }

    #[test]
    fn test_flipbook_rejects_zero_step() {
        let dir = tempdir().unwrap();
        assert!(render_flipbook(&synthetic(3), &dir.path().join("x.pdf"), 0).is_err());
    }

    #[test]
    fn test_snapshots_single_page() -> Result<()> {
        let dir = tempdir()?;
        let output = dir.path().join("snapshots.pdf");
        let meta = render_snapshots(&synthetic(12), &output, &[2, 5, 11], "Marker5")?;
        assert_eq!(meta.pdf.page_count, 1);
        assert_eq!(meta.frames, vec![2, 5, 11]);
        Ok(())
    }

    #[test]
    fn test_snapshots_validate_inputs() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("s.pdf");
        let file = synthetic(5);

        assert!(render_snapshots(&file, &output, &[], "Marker5").is_err());
        let err = render_snapshots(&file, &output, &[1, 400], "Marker5").unwrap_err();
        assert!(err.to_string().contains("400"));
        assert!(render_snapshots(&file, &output, &[1], "Marker9").is_err());
        assert!(!output.exists());
    }
}
