//! PDF rendering
//!
//! The Markdown export is parsed back with pulldown-cmark and laid out as
//! A4 pages with the built-in Helvetica fonts.

use super::{DocumentRenderer, MarkdownRenderer};
use crate::domain::Entry;
use crate::error::{JournalError, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use pulldown_cmark::{Event, HeadingLevel, Parser as MdParser, Tag, TagEnd};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const BODY_SIZE: f32 = 11.0;
const PT_TO_MM: f32 = 0.3528;

/// A laid-out unit of text
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem(String),
    Rule,
}

impl Block {
    fn font_size(&self) -> f32 {
        match self {
            Block::Heading { level: 1, .. } => 18.0,
            Block::Heading { .. } => 14.0,
            _ => BODY_SIZE,
        }
    }
}

/// Renders entries as a PDF document
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfRenderer {
    markdown: MarkdownRenderer,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, owner: &str, entries: &[Entry]) -> Result<Vec<u8>> {
        let markdown = self.markdown.render_string(owner, entries);
        let blocks = parse_blocks(&markdown);

        let title = format!("Journal for {}", owner);
        let (doc, page, layer) = PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let mut layout = Layout {
            layer: doc.get_page(page).get_layer(layer),
            doc: &doc,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        };

        for block in &blocks {
            let size = block.font_size();
            match block {
                Block::Heading { text, .. } => {
                    layout.space(size * PT_TO_MM * 0.6);
                    layout.write_wrapped(text, size, &bold, MARGIN);
                }
                Block::Paragraph(text) => layout.write_wrapped(text, size, &regular, MARGIN),
                Block::ListItem(text) => {
                    layout.write_wrapped(&format!("- {}", text), size, &regular, MARGIN + 5.0)
                }
                Block::Rule => layout.write_wrapped("* * *", size, &regular, PAGE_WIDTH / 2.0 - 5.0),
            }
            layout.space(size * PT_TO_MM * 0.6);
        }

        tracing::debug!(pages = layout.pages, blocks = blocks.len(), "laid out pdf");
        doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(err: printpdf::Error) -> JournalError {
    JournalError::Export(format!("PDF rendering failed: {}", err))
}

/// Tracks the write position and starts new pages when the current one is full
struct Layout<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl Layout<'_> {
    fn space(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
    }

    fn write_wrapped(&mut self, text: &str, size: f32, font: &IndirectFontRef, x: f32) {
        let line_height = size * PT_TO_MM * 1.4;
        let width = PAGE_WIDTH - MARGIN - x;

        for line in wrap(text, max_chars(size, width)) {
            if self.y - line_height < MARGIN {
                self.new_page();
            }
            self.y -= line_height;
            self.layer.use_text(line, size, Mm(x), Mm(self.y), font);
        }
    }
}

/// Approximate characters per line for Helvetica at `size` points
fn max_chars(size: f32, width_mm: f32) -> usize {
    let average_char_mm = size * PT_TO_MM * 0.5;
    ((width_mm / average_char_mm) as usize).max(10)
}

/// Greedy word wrap; explicit newlines always break
fn wrap(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let mut word = word.to_string();
            // hard-split words longer than a whole line
            while word.chars().count() > max {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let head: String = word.chars().take(max).collect();
                word = word.chars().skip(max).collect();
                lines.push(head);
            }

            let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
            if needed > max && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() || raw.trim().is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Flatten Markdown into blocks the layout understands
fn parse_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut text = String::new();
    let mut heading: Option<u8> = None;
    let mut in_item = false;

    for event in MdParser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(heading_level(level));
                text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                let level = heading.take().unwrap_or(2);
                blocks.push(Block::Heading {
                    level,
                    text: std::mem::take(&mut text),
                });
            }
            Event::Start(Tag::Item) => {
                in_item = true;
                text.clear();
            }
            Event::End(TagEnd::Item) => {
                in_item = false;
                blocks.push(Block::ListItem(std::mem::take(&mut text).trim().to_string()));
            }
            Event::Start(Tag::Paragraph | Tag::CodeBlock(_) | Tag::HtmlBlock) => {
                if !in_item {
                    text.clear();
                }
            }
            Event::End(TagEnd::Paragraph | TagEnd::CodeBlock | TagEnd::HtmlBlock) => {
                if !in_item {
                    let block = std::mem::take(&mut text);
                    blocks.push(Block::Paragraph(block.trim_end().to_string()));
                }
            }
            // raw HTML is printed as written
            Event::Text(t) | Event::Code(t) | Event::Html(t) | Event::InlineHtml(t) => {
                text.push_str(&t)
            }
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::Rule => blocks.push(Block::Rule),
            _ => {}
        }
    }

    blocks
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
