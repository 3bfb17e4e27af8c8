//! Drawing surface producing PDF content-stream operations.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner.

use super::color::Color;
use super::font::{encode_win_ansi, Font};
use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

/// Fill opacity levels registered as ExtGState resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alpha {
    A30,
    A40,
    A50,
    A60,
    A70,
}

impl Alpha {
    pub const ALL: [Alpha; 5] = [Alpha::A30, Alpha::A40, Alpha::A50, Alpha::A60, Alpha::A70];

    pub fn resource_name(&self) -> &'static str {
        match self {
            Alpha::A30 => "GA30",
            Alpha::A40 => "GA40",
            Alpha::A50 => "GA50",
            Alpha::A60 => "GA60",
            Alpha::A70 => "GA70",
        }
    }

    pub fn value(&self) -> f32 {
        match self {
            Alpha::A30 => 0.3,
            Alpha::A40 => 0.4,
            Alpha::A50 => 0.5,
            Alpha::A60 => 0.6,
            Alpha::A70 => 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
    FillStroke,
}

impl Paint {
    fn operator(&self) -> &'static str {
        match self {
            Paint::Fill => "f",
            Paint::Stroke => "S",
            Paint::FillStroke => "B",
        }
    }
}

/// Font, size and color of a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f64,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(font: Font, size: f64, color: Color) -> Self {
        Self { font, size, color }
    }

    pub fn width(&self, text: &str) -> f64 {
        self.font.text_width(text, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub(crate) fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

/// Bezier control distance for a quarter circle.
const KAPPA: f64 = 0.552_284_75;

#[derive(Debug, Default)]
pub struct Canvas {
    ops: Vec<Operation>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.ops
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    pub fn save(&mut self) {
        self.op("q", vec![]);
    }

    pub fn restore(&mut self) {
        self.op("Q", vec![]);
    }

    pub fn fill_color(&mut self, color: Color) {
        let [r, g, b] = color.components();
        self.op("rg", vec![r.into(), g.into(), b.into()]);
    }

    pub fn stroke_color(&mut self, color: Color) {
        let [r, g, b] = color.components();
        self.op("RG", vec![r.into(), g.into(), b.into()]);
    }

    pub fn line_width(&mut self, width: f64) {
        self.op("w", vec![real(width)]);
    }

    /// Dash pattern in points; an empty pattern draws solid lines.
    pub fn dash(&mut self, pattern: &[f64]) {
        let array = pattern.iter().map(|&v| real(v)).collect::<Vec<_>>();
        self.op("d", vec![Object::Array(array), Object::Integer(0)]);
    }

    pub fn alpha(&mut self, alpha: Alpha) {
        self.op("gs", vec![Object::Name(alpha.resource_name().as_bytes().to_vec())]);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.op("m", vec![real(x), real(y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.op("l", vec![real(x), real(y)]);
    }

    fn curve_to(&mut self, points: [(f64, f64); 3]) {
        let operands = points
            .iter()
            .flat_map(|&(x, y)| [real(x), real(y)])
            .collect();
        self.op("c", operands);
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: Paint) {
        self.op("re", vec![real(x), real(y), real(width), real(height)]);
        self.op(paint.operator(), vec![]);
    }

    /// Restrict further drawing to a rectangle until the next `restore`.
    pub fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.op("re", vec![real(x), real(y), real(width), real(height)]);
        self.op("W", vec![]);
        self.op("n", vec![]);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.move_to(x1, y1);
        self.line_to(x2, y2);
        self.op("S", vec![]);
    }

    pub fn polyline(&mut self, points: &[(f64, f64)]) {
        let Some((&(x, y), rest)) = points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        self.move_to(x, y);
        for &(x, y) in rest {
            self.line_to(x, y);
        }
        self.op("S", vec![]);
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], paint: Paint) {
        let Some((&(x, y), rest)) = points.split_first() else {
            return;
        };
        self.move_to(x, y);
        for &(x, y) in rest {
            self.line_to(x, y);
        }
        self.op("h", vec![]);
        self.op(paint.operator(), vec![]);
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, paint: Paint) {
        let k = r * KAPPA;
        self.move_to(cx + r, cy);
        self.curve_to([(cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)]);
        self.curve_to([(cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)]);
        self.curve_to([(cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)]);
        self.curve_to([(cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)]);
        self.op("h", vec![]);
        self.op(paint.operator(), vec![]);
    }

    /// Pie wedge between two angles in degrees, counter-clockwise from +x.
    pub fn wedge(&mut self, cx: f64, cy: f64, r: f64, from_deg: f64, to_deg: f64, paint: Paint) {
        let steps = ((to_deg - from_deg).abs() / 3.0).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push((cx, cy));
        for i in 0..=steps {
            let angle = (from_deg + (to_deg - from_deg) * i as f64 / steps as f64).to_radians();
            points.push((cx + r * angle.cos(), cy + r * angle.sin()));
        }
        self.polygon(&points, paint);
    }

    fn show_text(&mut self, style: TextStyle, text: &str, matrix: [f64; 6]) {
        self.fill_color(style.color);
        self.op("BT", vec![]);
        self.op(
            "Tf",
            vec![
                Object::Name(style.font.resource_name().as_bytes().to_vec()),
                real(style.size),
            ],
        );
        self.op("Tm", matrix.iter().map(|&v| real(v)).collect());
        self.op(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        );
        self.op("ET", vec![]);
    }

    /// Single line of text with its baseline at `y`.
    pub fn text(&mut self, x: f64, y: f64, style: TextStyle, text: &str, align: Align) {
        let width = style.width(text);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        self.show_text(style, text, [1.0, 0.0, 0.0, 1.0, x, y]);
    }

    /// Text rotated 90° counter-clockwise, centred on `(x, y)` along its run.
    pub fn text_vertical(&mut self, x: f64, y: f64, style: TextStyle, text: &str) {
        let width = style.width(text);
        self.show_text(style, text, [0.0, 1.0, -1.0, 0.0, x, y - width / 2.0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::color::NAVY;

    fn operators(canvas: &Canvas) -> Vec<&str> {
        canvas.operations().iter().map(|op| op.operator.as_str()).collect()
    }

    #[test]
    fn test_rect_and_color() {
        let mut canvas = Canvas::new();
        canvas.fill_color(NAVY);
        canvas.rect(0.0, 0.0, 10.0, 5.0, Paint::Fill);
        assert_eq!(operators(&canvas), vec!["rg", "re", "f"]);
    }

    #[test]
    fn test_text_is_wrapped_in_text_object() {
        let mut canvas = Canvas::new();
        let style = TextStyle::new(Font::Bold, 12.0, NAVY);
        canvas.text(100.0, 50.0, style, "Shoulder", Align::Center);
        assert_eq!(operators(&canvas), vec!["rg", "BT", "Tf", "Tm", "Tj", "ET"]);
        let tm = &canvas.operations()[3].operands;
        let x = tm[4].as_float().unwrap() as f64;
        assert!((x - (100.0 - Font::Bold.text_width("Shoulder", 12.0) / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_paths_are_skipped() {
        let mut canvas = Canvas::new();
        canvas.polyline(&[(1.0, 1.0)]);
        canvas.polygon(&[], Paint::Fill);
        assert!(canvas.operations().is_empty());
    }

    #[test]
    fn test_wedge_closes_path() {
        let mut canvas = Canvas::new();
        canvas.wedge(0.0, 0.0, 10.0, 0.0, 90.0, Paint::Fill);
        let ops = operators(&canvas);
        assert_eq!(ops.first(), Some(&"m"));
        assert_eq!(&ops[ops.len() - 2..], &["h", "f"]);
        // centre + 31 arc points
        assert_eq!(ops.iter().filter(|o| **o == "l").count(), 31);
    }
}
