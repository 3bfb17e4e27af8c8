//! # Charts
//!
//! Vector renditions of the report figures:
//! - metric time series with std band, reference band and event markers
//! - kinematic sequence (angular velocity per segment)
//! - arm slot wedge diagram

use crate::layout::Drawable;
use crate::pdf::color::{
    BLACK, BLUE, DARK_GRAY, GRAY, GRID_GRAY, LIGHT_BLUE, NAVY, RED, WHITE,
};
use crate::pdf::{Align, Alpha, Canvas, Color, Font, Paint, TextStyle};
use mocap_core::models::reference::format_number;
use mocap_core::{ArmSlotCategory, EventTimes, ReferenceRange, Segment, TimeSeries};

const TITLE_BAND: f64 = 16.0;
const BOTTOM_BAND: f64 = 26.0;
const LEFT_BAND: f64 = 40.0;
const RIGHT_PAD: f64 = 8.0;

const TICK_STYLE: TextStyle = TextStyle::new(Font::Regular, 7.0, DARK_GRAY);
const LABEL_STYLE: TextStyle = TextStyle::new(Font::Regular, 8.0, DARK_GRAY);
const TITLE_STYLE: TextStyle = TextStyle::new(Font::Bold, 10.0, NAVY);

// ============================================================================
// Axes
// ============================================================================

/// Axis limits with evenly spaced ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
}

/// Step of 1, 2 or 5 × 10^k closest to `raw`.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let step = if norm < 1.5 {
        1.0
    } else if norm < 3.0 {
        2.0
    } else if norm < 7.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

impl Axis {
    /// Axis covering `[lo, hi]` with roughly `target` intervals.
    pub fn nice(lo: f64, hi: f64, target: usize) -> Self {
        let (lo, hi) = if !lo.is_finite() || !hi.is_finite() {
            (0.0, 1.0)
        } else if (hi - lo).abs() < f64::EPSILON {
            (lo - 1.0, hi + 1.0)
        } else {
            (lo.min(hi), lo.max(hi))
        };
        let step = nice_step((hi - lo) / target.max(1) as f64);
        let min = (lo / step).floor() * step;
        let max = (hi / step).ceil() * step;
        let count = ((max - min) / step).round() as usize;
        let ticks = (0..=count).map(|i| min + i as f64 * step).collect();
        Self { min, max, ticks }
    }

    /// Fixed `[0, 1]` time axis.
    pub fn unit() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            ticks: (0..=5).map(|i| i as f64 * 0.2).collect(),
        }
    }

    fn span(&self) -> f64 {
        (self.max - self.min).max(f64::EPSILON)
    }
}

/// Plot rectangle in page points with its data axes.
#[derive(Debug, Clone)]
struct PlotArea {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    x_axis: Axis,
    y_axis: Axis,
}

impl PlotArea {
    fn new(x: f64, top: f64, width: f64, height: f64, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            x: x + LEFT_BAND,
            y: top - height + BOTTOM_BAND,
            width: (width - LEFT_BAND - RIGHT_PAD).max(1.0),
            height: (height - TITLE_BAND - BOTTOM_BAND).max(1.0),
            x_axis,
            y_axis,
        }
    }

    fn px(&self, t: f64) -> f64 {
        self.x + (t - self.x_axis.min) / self.x_axis.span() * self.width
    }

    fn py(&self, v: f64) -> f64 {
        self.y + (v - self.y_axis.min) / self.y_axis.span() * self.height
    }

    fn points(&self, times: &[f64], values: impl Iterator<Item = f64>) -> Vec<(f64, f64)> {
        times
            .iter()
            .zip(values)
            .map(|(&t, v)| (self.px(t), self.py(v)))
            .collect()
    }

    fn clip(&self, canvas: &mut Canvas) {
        canvas.clip_rect(self.x, self.y, self.width, self.height);
    }

    fn draw_grid(&self, canvas: &mut Canvas) {
        canvas.save();
        canvas.stroke_color(GRID_GRAY);
        canvas.line_width(0.5);
        for &t in &self.x_axis.ticks {
            canvas.line(self.px(t), self.y, self.px(t), self.y + self.height);
        }
        for &v in &self.y_axis.ticks {
            canvas.line(self.x, self.py(v), self.x + self.width, self.py(v));
        }
        canvas.restore();
    }

    fn draw_axes(&self, canvas: &mut Canvas, title: &str, x_label: &str, y_label: &str) {
        canvas.stroke_color(DARK_GRAY);
        canvas.line_width(0.75);
        canvas.rect(self.x, self.y, self.width, self.height, Paint::Stroke);

        for &t in &self.x_axis.ticks {
            let label = format!("{:.1}", t);
            canvas.text(self.px(t), self.y - 9.0, TICK_STYLE, &label, Align::Center);
        }
        for &v in &self.y_axis.ticks {
            let label = format_number(v);
            canvas.text(self.x - 3.0, self.py(v) - 2.5, TICK_STYLE, &label, Align::Right);
        }

        canvas.text(
            self.x + self.width / 2.0,
            self.y - BOTTOM_BAND + 4.0,
            LABEL_STYLE,
            x_label,
            Align::Center,
        );
        canvas.text_vertical(
            self.x - LEFT_BAND + 9.0,
            self.y + self.height / 2.0,
            LABEL_STYLE,
            y_label,
        );
        canvas.text(
            self.x + self.width / 2.0,
            self.y + self.height + 5.0,
            TITLE_STYLE,
            title,
            Align::Center,
        );
    }

    fn draw_vertical(&self, canvas: &mut Canvas, t: f64, style: &LineStyle) {
        canvas.save();
        style.apply(canvas);
        canvas.line(self.px(t), self.y, self.px(t), self.y + self.height);
        canvas.restore();
    }
}

// ============================================================================
// Line styles and legends
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Vec<f64>,
    pub alpha: Option<Alpha>,
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
            alpha: None,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dash = vec![4.0, 2.0];
        self
    }

    pub fn with_alpha(mut self, alpha: Alpha) -> Self {
        self.alpha = Some(alpha);
        self
    }

    fn apply(&self, canvas: &mut Canvas) {
        if let Some(alpha) = self.alpha {
            canvas.alpha(alpha);
        }
        canvas.stroke_color(self.color);
        canvas.line_width(self.width);
        canvas.dash(&self.dash);
    }
}

/// Event marker styles: FP solid blue, MER dashed black, REL solid red.
pub fn event_markers(events: &EventTimes, include_mer: bool) -> Vec<(f64, LineStyle)> {
    let mut markers = vec![(
        events.foot_plant,
        LineStyle::solid(BLUE, 1.5).with_alpha(Alpha::A70),
    )];
    if include_mer {
        markers.push((
            events.max_external_rotation,
            LineStyle::solid(BLACK, 1.0).dashed().with_alpha(Alpha::A50),
        ));
    }
    markers.push((
        events.release,
        LineStyle::solid(RED, 1.5).with_alpha(Alpha::A70),
    ));
    markers
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMark {
    Line,
    Dot,
}

/// Boxed legend anchored at its top-left corner.
pub fn draw_legend(canvas: &mut Canvas, x: f64, top: f64, entries: &[(LegendMark, Color, &str)]) {
    if entries.is_empty() {
        return;
    }
    let row = 11.0;
    let width = entries
        .iter()
        .map(|(_, _, label)| TICK_STYLE.width(label))
        .fold(0.0, f64::max)
        + 30.0;
    let height = entries.len() as f64 * row + 6.0;

    canvas.fill_color(WHITE);
    canvas.stroke_color(GRID_GRAY);
    canvas.line_width(0.5);
    canvas.rect(x, top - height, width, height, Paint::FillStroke);

    for (i, (mark, color, label)) in entries.iter().enumerate() {
        let cy = top - 3.0 - row * (i as f64 + 0.5);
        match mark {
            LegendMark::Line => {
                canvas.stroke_color(*color);
                canvas.line_width(1.5);
                canvas.line(x + 4.0, cy, x + 20.0, cy);
            }
            LegendMark::Dot => {
                canvas.fill_color(*color);
                canvas.circle(x + 12.0, cy, 2.5, Paint::Fill);
            }
        }
        canvas.text(x + 24.0, cy - 2.5, TICK_STYLE, label, Align::Left);
    }
}

// ============================================================================
// Time series chart
// ============================================================================

/// Mean curve of one metric with its bands and event markers.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesChart {
    pub title: String,
    pub y_label: String,
    pub series: TimeSeries,
    /// Shaded reference band; stress charts have none
    pub reference: Option<ReferenceRange>,
    pub events: EventTimes,
    pub height: f64,
}

impl TimeSeriesChart {
    pub fn new(title: &str, y_label: &str, series: TimeSeries, events: EventTimes) -> Self {
        Self {
            title: title.to_string(),
            y_label: y_label.to_string(),
            series,
            reference: None,
            events,
            height: 200.0,
        }
    }

    pub fn with_reference(mut self, reference: Option<ReferenceRange>) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    fn y_axis(&self) -> Axis {
        let (mut lo, mut hi) = self.series.bounds().unwrap_or((0.0, 1.0));
        if let Some(range) = &self.reference {
            lo = lo.min(range.low());
            hi = hi.max(range.high());
        }
        let pad = (hi - lo) * 0.05;
        Axis::nice(lo - pad, hi + pad, 5)
    }
}

impl Drawable for TimeSeriesChart {
    fn height(&self, _width: f64) -> f64 {
        self.height
    }

    fn draw(&self, canvas: &mut Canvas, x: f64, top: f64, width: f64) {
        let area = PlotArea::new(x, top, width, self.height, Axis::unit(), self.y_axis());
        area.draw_grid(canvas);

        canvas.save();
        area.clip(canvas);

        if let Some(range) = &self.reference {
            canvas.save();
            canvas.alpha(Alpha::A30);
            canvas.fill_color(LIGHT_BLUE);
            let (y0, y1) = (area.py(range.low()), area.py(range.high()));
            canvas.rect(area.x, y0, area.width, y1 - y0, Paint::Fill);
            canvas.restore();
        }

        if self.series.has_band() {
            let s = &self.series;
            let mut band = area.points(&s.times, s.mean.iter().zip(&s.std).map(|(m, d)| m + d));
            let lower = area.points(&s.times, s.mean.iter().zip(&s.std).map(|(m, d)| m - d));
            band.extend(lower.into_iter().rev());
            canvas.save();
            canvas.alpha(Alpha::A40);
            canvas.fill_color(NAVY);
            canvas.polygon(&band, Paint::Fill);
            canvas.restore();
        }

        canvas.save();
        LineStyle::solid(BLUE, 1.5).apply(canvas);
        canvas.polyline(&area.points(&self.series.times, self.series.mean.iter().copied()));
        canvas.restore();

        for (t, style) in event_markers(&self.events, true) {
            area.draw_vertical(canvas, t, &style);
        }
        canvas.restore();

        area.draw_axes(canvas, &self.title, "Time (s)", &self.y_label);
    }
}

// ============================================================================
// Kinematic sequence chart
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct KinematicChart {
    pub series: Vec<(Segment, TimeSeries)>,
    pub events: EventTimes,
    pub height: f64,
}

impl KinematicChart {
    pub fn new(series: Vec<(Segment, TimeSeries)>, events: EventTimes) -> Self {
        Self {
            series,
            events,
            height: 260.0,
        }
    }

    fn y_axis(&self) -> Axis {
        let (lo, hi) = self
            .series
            .iter()
            .filter_map(|(_, s)| s.bounds())
            .fold((0.0f64, 0.0f64), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
        let pad = (hi - lo) * 0.05;
        Axis::nice(lo - pad, hi + pad, 6)
    }
}

pub fn segment_color(segment: Segment) -> Color {
    Color::hex_or(segment.color_hex(), BLACK)
}

impl Drawable for KinematicChart {
    fn height(&self, _width: f64) -> f64 {
        self.height
    }

    fn draw(&self, canvas: &mut Canvas, x: f64, top: f64, width: f64) {
        let area = PlotArea::new(x, top, width, self.height, Axis::unit(), self.y_axis());
        area.draw_grid(canvas);

        canvas.save();
        area.clip(canvas);
        canvas.save();
        LineStyle::solid(GRAY, 0.75).dashed().apply(canvas);
        canvas.line(area.x, area.py(0.0), area.x + area.width, area.py(0.0));
        canvas.restore();

        for (segment, series) in &self.series {
            canvas.save();
            LineStyle::solid(segment_color(*segment), 1.5).apply(canvas);
            canvas.polyline(&area.points(&series.times, series.mean.iter().copied()));
            canvas.restore();
        }
        for (t, style) in event_markers(&self.events, false) {
            area.draw_vertical(canvas, t, &style);
        }
        canvas.restore();

        area.draw_axes(
            canvas,
            "Kinematic Sequence",
            "Time (s)",
            "Angular Velocities (°/s)",
        );

        let entries: Vec<(LegendMark, Color, &str)> = self
            .series
            .iter()
            .map(|(segment, _)| (LegendMark::Line, segment_color(*segment), segment.name()))
            .collect();
        draw_legend(canvas, area.x + 6.0, area.y + area.height - 6.0, &entries);
    }
}

// ============================================================================
// Arm slot diagram
// ============================================================================

/// Category wedges (0° = straight up) with an indicator at the measured slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmSlotDiagram {
    pub angle: Option<f64>,
    pub height: f64,
}

impl ArmSlotDiagram {
    pub fn new(angle: Option<f64>) -> Self {
        Self {
            angle,
            height: 170.0,
        }
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }
}

impl Drawable for ArmSlotDiagram {
    fn height(&self, _width: f64) -> f64 {
        self.height
    }

    fn draw(&self, canvas: &mut Canvas, x: f64, top: f64, width: f64) {
        let radius = (width * 0.42).min(self.height * 0.72);
        let cx = x + width / 2.0;
        let cy = top - self.height + self.height * 0.2;

        canvas.save();
        canvas.clip_rect(x, top - self.height, width, self.height);
        canvas.stroke_color(WHITE);
        canvas.line_width(1.0);
        for category in ArmSlotCategory::ALL {
            let (start, end) = category.span();
            canvas.fill_color(Color::hex_or(category.color_hex(), GRAY));
            canvas.wedge(cx, cy, radius, 90.0 - end, 90.0 - start, Paint::FillStroke);
        }

        if let Some(angle) = self.angle {
            let theta = (90.0 - angle).to_radians();
            let (tx, ty) = (
                cx + radius * 1.05 * theta.cos(),
                cy + radius * 1.05 * theta.sin(),
            );
            canvas.stroke_color(RED);
            canvas.line_width(2.0);
            canvas.line(cx, cy, tx, ty);
            canvas.fill_color(RED);
            canvas.circle(tx, ty, 3.0, Paint::Fill);
        }
        canvas.fill_color(DARK_GRAY);
        canvas.circle(cx, cy, 2.0, Paint::Fill);
        canvas.restore();

        canvas.text(cx, cy + radius + 4.0, TICK_STYLE, "0°", Align::Center);
        canvas.text(cx + radius + 3.0, cy - 2.5, TICK_STYLE, "90°", Align::Left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocap_core::series::representative;
    use mocap_core::{MetricKey, Signal};

    #[test]
    fn test_nice_axis_covers_range() {
        let axis = Axis::nice(-37.0, 118.0, 5);
        assert!(axis.min <= -37.0 && axis.max >= 118.0);
        assert_eq!(axis.ticks.first(), Some(&axis.min));
        assert!((axis.ticks.last().unwrap() - axis.max).abs() < 1e-9);
        let step = axis.ticks[1] - axis.ticks[0];
        assert!((step - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_nice_axis_degenerate_input() {
        let flat = Axis::nice(5.0, 5.0, 5);
        assert!(flat.min < 5.0 && flat.max > 5.0);
        let nan = Axis::nice(f64::NAN, 1.0, 5);
        assert!(nan.min.abs() < 1e-9 && (nan.max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_y_axis_includes_reference() {
        let series = representative(Signal::Angle(MetricKey::ElbowFlexion));
        let range = ReferenceRange::new(-500.0, 500.0).unwrap();
        let chart = TimeSeriesChart::new("Elbow Flexion", "Angle (°)", series, EventTimes::default())
            .with_reference(Some(range));
        let axis = chart.y_axis();
        assert!(axis.min <= -500.0 && axis.max >= 500.0);
    }

    #[test]
    fn test_event_markers() {
        let events = EventTimes::default();
        let markers = event_markers(&events, true);
        assert_eq!(markers.len(), 3);
        assert_eq!(markers[1].0, 0.7);
        assert!(!markers[1].1.dash.is_empty());
        assert_eq!(event_markers(&events, false).len(), 2);
    }

    #[test]
    fn test_charts_draw_within_height() {
        let series = representative(Signal::Angle(MetricKey::TrunkRotation));
        let chart = TimeSeriesChart::new("Trunk Rotation", "Angle (°)", series, EventTimes::default());
        let mut canvas = Canvas::new();
        chart.draw(&mut canvas, 36.0, 500.0, 240.0);
        assert_eq!(chart.height(240.0), 200.0);
        let ops = canvas.operations();
        let saves = ops.iter().filter(|o| o.operator == "q").count();
        let restores = ops.iter().filter(|o| o.operator == "Q").count();
        assert_eq!(saves, restores);
    }

    #[test]
    fn test_arm_slot_without_angle_has_no_indicator() {
        let mut with = Canvas::new();
        ArmSlotDiagram::new(Some(62.0)).draw(&mut with, 0.0, 200.0, 200.0);
        let mut without = Canvas::new();
        ArmSlotDiagram::new(None).draw(&mut without, 0.0, 200.0, 200.0);
        assert!(with.operations().len() > without.operations().len());
    }
}
