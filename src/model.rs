use std::ops::Range;
use std::sync::Arc;

use crate::docx::Package;

/// Font size used when neither the run, its styles nor the document defaults set one.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    pub text: String,
    pub font_size: f32, // points
    pub font_name: Option<String>,
    pub bold: bool,
    pub italic: bool,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: DEFAULT_FONT_SIZE,
            font_name: None,
            bold: false,
            italic: false,
        }
    }

    pub fn with_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

/// Where a paragraph came from in `word/document.xml`, so the writer can splice
/// rewritten paragraphs back without touching the rest of the package.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Origin {
    pub(crate) span: Range<usize>,
    pub(crate) properties: Option<String>, // raw w:pPr
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub(crate) origin: Option<Origin>,
    pub(crate) rewritten: bool,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            origin: None,
            rewritten: false,
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Replace all runs with a single one. Marks the paragraph for re-emission on write.
    pub fn set_single_run(&mut self, run: Run) {
        self.runs = vec![run];
        self.rewritten = true;
    }

    pub fn is_rewritten(&self) -> bool {
        self.rewritten
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .flat_map(|cell| cell.paragraphs.iter())
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.rows
            .iter_mut()
            .flat_map(|row| row.cells.iter_mut())
            .flat_map(|cell| cell.paragraphs.iter_mut())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    fn paragraphs(&self) -> Box<dyn Iterator<Item = &Paragraph> + '_> {
        match self {
            Block::Paragraph(p) => Box::new(std::iter::once(p)),
            Block::Table(t) => Box::new(t.paragraphs()),
        }
    }

    fn paragraphs_mut(&mut self) -> Box<dyn Iterator<Item = &mut Paragraph> + '_> {
        match self {
            Block::Paragraph(p) => Box::new(std::iter::once(p)),
            Block::Table(t) => Box::new(t.paragraphs_mut()),
        }
    }
}

/// A structured document: blocks in visual order. Documents loaded from a DOCX
/// keep the source package so they can be written back in their native format.
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub(crate) package: Option<Arc<Package>>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            package: None,
        }
    }

    /// Every text-bearing paragraph: body paragraphs and table-cell paragraphs, in layout order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().flat_map(|b| b.paragraphs())
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().flat_map(|b| b.paragraphs_mut())
    }

    /// Whether this document was loaded from a DOCX package.
    pub fn has_source_package(&self) -> bool {
        self.package.is_some()
    }

    /// Plain-text rendering with placeholders left in place. Table rows become
    /// one line each, cells separated by ` | `.
    pub fn plain_text(&self) -> String {
        let parts: Vec<String> = self
            .blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(p) => p.text(),
                Block::Table(t) => t
                    .rows
                    .iter()
                    .map(|row| {
                        row.cells
                            .iter()
                            .map(|cell| {
                                cell.paragraphs
                                    .iter()
                                    .map(Paragraph::text)
                                    .filter(|t| !t.is_empty())
                                    .collect::<Vec<_>>()
                                    .join("\n")
                            })
                            .collect::<Vec<_>>()
                            .join(" | ")
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            })
            .collect();
        parts.join("\n\n")
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}
