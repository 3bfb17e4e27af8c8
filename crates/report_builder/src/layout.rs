//! # Page Layout
//!
//! A report page is a title plus a vertical flow of blocks. `Columns`
//! splits the width by weight and stacks blocks inside each column; the
//! row is as tall as its tallest column.

use crate::chart::{ArmSlotDiagram, KinematicChart, TimeSeriesChart};
use crate::pdf::color::{DARK_GRAY, GOLD, NAVY};
use crate::pdf::{Align, Canvas, Color, Font, Paint, TextStyle};
use crate::table::Table;
use tracing::warn;

pub const PAGE_MARGIN: f64 = 36.0;
pub const HEADER_HEIGHT: f64 = 60.0;
const FOOTER_BAND: f64 = 28.0;
const COLUMN_GAP: f64 = 14.0;
const TITLE_SIZE: f64 = 24.0;

/// Anything placed in the page flow.
pub trait Drawable {
    fn height(&self, width: f64) -> f64;
    fn draw(&self, canvas: &mut Canvas, x: f64, top: f64, width: f64);
}

impl Drawable for Table {
    fn height(&self, _width: f64) -> f64 {
        Table::height(self)
    }

    fn draw(&self, canvas: &mut Canvas, x: f64, top: f64, width: f64) {
        Table::draw(self, canvas, x, top, width);
    }
}

// ============================================================================
// Paragraphs
// ============================================================================

/// A run of text in one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: TextStyle,
}

/// Word-wrapped text made of styled spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    spans: Vec<Span>,
    size: f64,
    align: Align,
}

impl Paragraph {
    pub fn new(size: f64) -> Self {
        Self {
            spans: Vec::new(),
            size,
            align: Align::Left,
        }
    }

    pub fn plain(text: &str, size: f64) -> Self {
        Self::new(size).span(text, Font::Regular, DARK_GRAY)
    }

    pub fn span(mut self, text: &str, font: Font, color: Color) -> Self {
        self.spans.push(Span {
            text: text.to_string(),
            style: TextStyle::new(font, self.size, color),
        });
        self
    }

    pub fn bold(self, text: &str) -> Self {
        self.span(text, Font::Bold, DARK_GRAY)
    }

    pub fn text(self, text: &str) -> Self {
        self.span(text, Font::Regular, DARK_GRAY)
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    /// Full text without styling.
    pub fn content(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn leading(&self) -> f64 {
        self.size * 1.3
    }

    /// Greedy line breaking; each line is a list of (style, word) runs.
    fn lines(&self, width: f64) -> Vec<Vec<(TextStyle, String)>> {
        let mut lines: Vec<Vec<(TextStyle, String)>> = Vec::new();
        let mut current: Vec<(TextStyle, String)> = Vec::new();
        let mut used = 0.0;
        let mut pending_space = false;

        for span in &self.spans {
            let starts_with_space = span.text.starts_with(char::is_whitespace);
            for (i, word) in span.text.split_whitespace().enumerate() {
                let space = if current.is_empty() {
                    0.0
                } else if i > 0 || pending_space || starts_with_space {
                    span.style.width(" ")
                } else {
                    0.0
                };
                let word_width = span.style.width(word);
                if !current.is_empty() && used + space + word_width > width {
                    lines.push(std::mem::take(&mut current));
                    used = 0.0;
                    current.push((span.style, word.to_string()));
                    used += word_width;
                    continue;
                }
                let text = if space > 0.0 {
                    format!(" {}", word)
                } else {
                    word.to_string()
                };
                used += space + word_width;
                current.push((span.style, text));
            }
            pending_space = span.text.ends_with(char::is_whitespace);
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

impl Drawable for Paragraph {
    fn height(&self, width: f64) -> f64 {
        self.lines(width).len() as f64 * self.leading()
    }

    fn draw(&self, canvas: &mut Canvas, x: f64, top: f64, width: f64) {
        for (i, line) in self.lines(width).iter().enumerate() {
            let baseline = top - self.size - i as f64 * self.leading();
            let line_width: f64 = line.iter().map(|(style, text)| style.width(text)).sum();
            let mut cx = match self.align {
                Align::Left => x,
                Align::Center => x + (width - line_width) / 2.0,
                Align::Right => x + width - line_width,
            };
            for (style, text) in line {
                canvas.text(cx, baseline, *style, text, Align::Left);
                cx += style.width(text);
            }
        }
    }
}

// ============================================================================
// Blocks
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Gold section title, centred
    Title(String),
    /// Navy bold sub-heading
    Heading(String),
    Paragraph(Paragraph),
    Spacer(f64),
    Table(Table),
    Chart(TimeSeriesChart),
    Kinematic(KinematicChart),
    ArmSlot(ArmSlotDiagram),
    Columns(Vec<Column>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub weight: f64,
    pub blocks: Vec<Block>,
}

impl Column {
    pub fn new(weight: f64, blocks: Vec<Block>) -> Self {
        Self { weight, blocks }
    }
}

fn title_style() -> TextStyle {
    TextStyle::new(Font::Bold, TITLE_SIZE, GOLD)
}

fn heading_style() -> TextStyle {
    TextStyle::new(Font::Bold, 12.0, NAVY)
}

fn column_widths(columns: &[Column], width: f64) -> Vec<f64> {
    let gaps = COLUMN_GAP * columns.len().saturating_sub(1) as f64;
    let total: f64 = columns.iter().map(|c| c.weight.max(0.0)).sum();
    let available = (width - gaps).max(0.0);
    columns
        .iter()
        .map(|c| {
            if total > 0.0 {
                available * c.weight.max(0.0) / total
            } else {
                available / columns.len() as f64
            }
        })
        .collect()
}

fn stack_height(blocks: &[Block], width: f64) -> f64 {
    blocks.iter().map(|b| b.height(width)).sum()
}

impl Drawable for Block {
    fn height(&self, width: f64) -> f64 {
        match self {
            Block::Title(_) => TITLE_SIZE + 10.0,
            Block::Heading(_) => 18.0,
            Block::Paragraph(p) => p.height(width),
            Block::Spacer(h) => *h,
            Block::Table(t) => Drawable::height(t, width),
            Block::Chart(c) => c.height(width),
            Block::Kinematic(c) => c.height(width),
            Block::ArmSlot(d) => d.height(width),
            Block::Columns(columns) => columns
                .iter()
                .zip(column_widths(columns, width))
                .map(|(c, w)| stack_height(&c.blocks, w))
                .fold(0.0, f64::max),
        }
    }

    fn draw(&self, canvas: &mut Canvas, x: f64, top: f64, width: f64) {
        match self {
            Block::Title(text) => {
                canvas.text(x + width / 2.0, top - TITLE_SIZE, title_style(), text, Align::Center);
            }
            Block::Heading(text) => {
                canvas.text(x, top - 13.0, heading_style(), text, Align::Left);
            }
            Block::Paragraph(p) => p.draw(canvas, x, top, width),
            Block::Spacer(_) => {}
            Block::Table(t) => Drawable::draw(t, canvas, x, top, width),
            Block::Chart(c) => c.draw(canvas, x, top, width),
            Block::Kinematic(c) => c.draw(canvas, x, top, width),
            Block::ArmSlot(d) => d.draw(canvas, x, top, width),
            Block::Columns(columns) => {
                let mut cx = x;
                for (column, w) in columns.iter().zip(column_widths(columns, width)) {
                    let mut y = top;
                    for block in &column.blocks {
                        block.draw(canvas, cx, y, w);
                        y -= block.height(w);
                    }
                    cx += w + COLUMN_GAP;
                }
            }
        }
    }
}

impl Block {
    /// Visit this block and every nested block.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Block)) {
        visit(self);
        if let Block::Columns(columns) = self {
            for block in columns.iter().flat_map(|c| &c.blocks) {
                block.walk(visit);
            }
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Text shared by every page's header bar and footer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageChrome {
    pub player_name: String,
    pub velocity_range: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl ReportPage {
    pub fn new(title: &str, blocks: Vec<Block>) -> Self {
        Self {
            title: title.to_string(),
            blocks,
        }
    }

    /// Every block on the page, nested ones included.
    pub fn all_blocks(&self) -> Vec<&Block> {
        let mut out = Vec::new();
        for block in &self.blocks {
            block.walk(&mut |b| out.push(b));
        }
        out
    }

    pub fn tables(&self) -> Vec<&Table> {
        self.all_blocks()
            .into_iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn charts(&self) -> Vec<&TimeSeriesChart> {
        self.all_blocks()
            .into_iter()
            .filter_map(|b| match b {
                Block::Chart(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Draw header bar, title, content flow and footer.
    pub fn render(
        &self,
        chrome: &PageChrome,
        (width, height): (f64, f64),
        number: usize,
        total: usize,
    ) -> Canvas {
        let mut canvas = Canvas::new();

        canvas.fill_color(NAVY);
        canvas.rect(0.0, height - HEADER_HEIGHT, width, HEADER_HEIGHT, Paint::Fill);
        canvas.text(
            30.0,
            height - 40.0,
            TextStyle::new(Font::Bold, 20.0, GOLD),
            &format!("Mocap Report: {}", chrome.player_name),
            Align::Left,
        );
        canvas.text(
            width - 30.0,
            height - 38.0,
            TextStyle::new(Font::Bold, 14.0, GOLD),
            &format!("Velocity: {}", chrome.velocity_range),
            Align::Right,
        );

        let content_width = width - 2.0 * PAGE_MARGIN;
        let mut y = height - HEADER_HEIGHT - 12.0;
        let title = Block::Title(self.title.clone());
        let bottom = PAGE_MARGIN;
        for block in std::iter::once(&title).chain(&self.blocks) {
            block.draw(&mut canvas, PAGE_MARGIN, y, content_width);
            y -= block.height(content_width);
        }
        if y < bottom {
            warn!("Page '{}' overflows its content area by {:.0}pt", self.title, bottom - y);
        }

        let footer = TextStyle::new(Font::Regular, 8.0, DARK_GRAY);
        let footer_y = (FOOTER_BAND - 8.0) / 2.0 + 4.0;
        canvas.stroke_color(GOLD);
        canvas.line_width(1.0);
        canvas.line(PAGE_MARGIN, FOOTER_BAND, width - PAGE_MARGIN, FOOTER_BAND);
        canvas.text(PAGE_MARGIN, footer_y, footer, &chrome.date, Align::Left);
        canvas.text(
            width - PAGE_MARGIN,
            footer_y,
            footer,
            &format!("Page {} of {}", number, total),
            Align::Right,
        );
        canvas
    }

    /// Height of the content flow below the header, title included.
    pub fn content_height(&self, width: f64) -> f64 {
        let title = Block::Title(self.title.clone());
        title.height(width) + stack_height(&self.blocks, width)
    }
}
