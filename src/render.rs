//! SVG export documents.

use std::path::Path;

use svg::{
    node::{
        element::{Rectangle, Text},
        Text as TextNode,
    },
    Document,
};
use tally_core::{CoreError, DocumentRenderer};

const MIN_PAGE_WIDTH: f64 = 768.0;
const LINE_HEIGHT: f64 = 48.0;
const MARGIN: f64 = 48.0;
const BOX_HEIGHT: f64 = 32.0;
const FONT_SIZE: f64 = 16.0;
const CHAR_WIDTH: f64 = 9.0;
const TEXT_INSET: f64 = 8.0;

/// Renders each line in its own light-blue box, stacked on one page sized to
/// the number of lines and the longest line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn page_height(line_count: usize) -> f64 {
        line_count as f64 * LINE_HEIGHT + 2.0 * MARGIN
    }

    pub fn page_width(lines: &[String]) -> f64 {
        let widest = lines.iter().map(|line| box_width(line)).fold(0.0, f64::max);
        (widest + 2.0 * MARGIN).max(MIN_PAGE_WIDTH)
    }

    pub fn document(&self, lines: &[String]) -> Document {
        let width = Self::page_width(lines);
        let height = Self::page_height(lines.len());
        let background = Rectangle::new()
            .set("width", width)
            .set("height", height)
            .set("fill", "white");

        lines.iter().enumerate().fold(
            Document::new()
                .set("width", width)
                .set("height", height)
                .set("viewBox", (0.0, 0.0, width, height))
                .add(background),
            |doc, (index, line)| {
                let middle = MARGIN + index as f64 * LINE_HEIGHT + LINE_HEIGHT / 2.0;
                let frame = Rectangle::new()
                    .set("x", MARGIN)
                    .set("y", middle - BOX_HEIGHT / 2.0)
                    .set("width", box_width(line))
                    .set("height", BOX_HEIGHT)
                    .set("fill", "lightblue")
                    .set("fill-opacity", 0.5);
                let text = Text::new("")
                    .set("x", MARGIN + TEXT_INSET)
                    .set("y", middle)
                    .set("dominant-baseline", "middle")
                    .set("font-family", "sans-serif")
                    .set("font-size", FONT_SIZE)
                    .add(TextNode::new(line.as_str()));
                doc.add(frame).add(text)
            },
        )
    }
}

fn box_width(line: &str) -> f64 {
    line.chars().count() as f64 * CHAR_WIDTH + 2.0 * TEXT_INSET
}

impl DocumentRenderer for SvgRenderer {
    fn extension(&self) -> &str {
        "svg"
    }

    fn render(&self, lines: &[String], target: &Path) -> Result<(), CoreError> {
        svg::save(target, &self.document(lines))
            .map_err(|err| CoreError::Render(format!("{}: {}", target.display(), err)))
    }
}
