//! Grid tables with a navy header row and per-cell fills.

use crate::pdf::color::{BLACK, NAVY, WHITE};
use crate::pdf::{Align, Canvas, Color, Font, Paint, TextStyle};

const CELL_PADDING: f64 = 4.0;
const LEADING: f64 = 1.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub fill: Option<Color>,
    pub bold: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fill: None,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn filled(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    fn line_count(&self) -> usize {
        self.lines().count()
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::new(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::new(text)
    }
}

/// A table laid out to the width it is drawn at.
///
/// Column widths are relative weights. A single header cell spans the
/// whole table. Cell text breaks only at `\n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<f64>,
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
    font_size: f64,
    max_width: Option<f64>,
}

impl Table {
    pub fn new(columns: &[f64]) -> Self {
        Self {
            columns: columns.to_vec(),
            header: Vec::new(),
            rows: Vec::new(),
            font_size: 9.0,
            max_width: None,
        }
    }

    pub fn header<S: AsRef<str>>(mut self, header: &[S]) -> Self {
        self.header = header.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Cap the drawn width; narrower tables are centred.
    pub fn max_width(mut self, width: f64) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn row<C: Into<Cell>>(mut self, cells: impl IntoIterator<Item = C>) -> Self {
        self.push_row(cells);
        self
    }

    pub fn push_row<C: Into<Cell>>(&mut self, cells: impl IntoIterator<Item = C>) {
        let mut row: Vec<Cell> = cells.into_iter().map(Into::into).collect();
        row.resize_with(self.columns.len(), || Cell::new(""));
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn line_height(&self) -> f64 {
        self.font_size * LEADING
    }

    fn header_height(&self) -> f64 {
        if self.header.is_empty() {
            0.0
        } else {
            self.line_height() + 2.0 * CELL_PADDING
        }
    }

    fn row_height(&self, row: &[Cell]) -> f64 {
        let lines = row.iter().map(Cell::line_count).max().unwrap_or(1);
        lines as f64 * self.line_height() + 2.0 * CELL_PADDING
    }

    pub fn height(&self) -> f64 {
        self.header_height() + self.rows.iter().map(|r| self.row_height(r)).sum::<f64>()
    }

    fn column_widths(&self, width: f64) -> Vec<f64> {
        let total: f64 = self.columns.iter().sum();
        if total <= 0.0 {
            let n = self.columns.len().max(1) as f64;
            return vec![width / n; self.columns.len()];
        }
        self.columns.iter().map(|w| width * w / total).collect()
    }

    /// Draw with the top-left corner at `(x, top)`; returns the height used.
    pub fn draw(&self, canvas: &mut Canvas, x: f64, top: f64, width: f64) -> f64 {
        let table_width = self.max_width.map_or(width, |w| w.min(width));
        let x = x + (width - table_width) / 2.0;
        let widths = self.column_widths(table_width);
        let mut y = top;

        if !self.header.is_empty() {
            let h = self.header_height();
            canvas.fill_color(NAVY);
            canvas.rect(x, y - h, table_width, h, Paint::Fill);
            let style = TextStyle::new(Font::Bold, self.font_size, WHITE);
            let baseline = y - CELL_PADDING - self.font_size;
            if self.header.len() == 1 {
                canvas.text(x + table_width / 2.0, baseline, style, &self.header[0], Align::Center);
            } else {
                let mut cx = x;
                for (text, w) in self.header.iter().zip(&widths) {
                    canvas.text(cx + w / 2.0, baseline, style, text, Align::Center);
                    cx += w;
                }
            }
            y -= h;
        }

        let mut row_tops = Vec::with_capacity(self.rows.len() + 1);
        for row in &self.rows {
            row_tops.push(y);
            let h = self.row_height(row);
            let mut cx = x;
            for (cell, w) in row.iter().zip(&widths) {
                if let Some(fill) = cell.fill {
                    canvas.fill_color(fill);
                    canvas.rect(cx, y - h, *w, h, Paint::Fill);
                }
                let font = if cell.bold { Font::Bold } else { Font::Regular };
                let style = TextStyle::new(font, self.font_size, BLACK);
                let lines = cell.line_count() as f64;
                let first = y - (h - lines * self.line_height()) / 2.0 - self.font_size;
                for (i, line) in cell.lines().enumerate() {
                    let baseline = first - i as f64 * self.line_height();
                    canvas.text(cx + w / 2.0, baseline, style, line, Align::Center);
                }
                cx += w;
            }
            y -= h;
        }
        row_tops.push(y);

        // grid
        let bottom = y;
        canvas.stroke_color(NAVY);
        canvas.line_width(1.0);
        canvas.rect(x, bottom, table_width, top - bottom, Paint::Stroke);
        for row_top in row_tops.iter().skip(1).take(self.rows.len().saturating_sub(1)) {
            canvas.line(x, *row_top, x + table_width, *row_top);
        }
        if !self.header.is_empty() && !self.rows.is_empty() {
            canvas.line(x, top - self.header_height(), x + table_width, top - self.header_height());
        }
        let body_top = if self.header.len() == 1 {
            top - self.header_height()
        } else {
            top
        };
        let mut cx = x;
        for w in widths.iter().take(widths.len().saturating_sub(1)) {
            cx += w;
            canvas.line(cx, body_top, cx, bottom);
        }

        top - bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(&[1.0, 2.0, 2.0])
            .header(&["", "Mean ± Std Dev", "Reference"])
            .row(["FP", "113° ± 1°", "-36° - -12°"])
            .row(vec![Cell::new("MER"), Cell::new("N/A").filled(WHITE)])
    }

    #[test]
    fn test_rows_are_padded_to_column_count() {
        let table = sample();
        assert_eq!(table.rows().len(), 2);
        assert!(table.rows().iter().all(|r| r.len() == 3));
        assert_eq!(table.rows()[1][2].text, "");
    }

    #[test]
    fn test_height_counts_multiline_cells() {
        let single = Table::new(&[1.0]).row(["a"]);
        let double = Table::new(&[1.0]).row(["a\nb"]);
        let line = 9.0 * LEADING;
        assert!((double.height() - single.height() - line).abs() < 1e-9);
    }

    #[test]
    fn test_draw_returns_height() {
        let table = sample();
        let mut canvas = Canvas::new();
        let used = table.draw(&mut canvas, 36.0, 500.0, 300.0);
        assert!((used - table.height()).abs() < 1e-9);
        assert!(!canvas.operations().is_empty());
    }

    #[test]
    fn test_column_widths_follow_weights() {
        let widths = sample().column_widths(500.0);
        assert_eq!(widths, vec![100.0, 200.0, 200.0]);
    }
}
