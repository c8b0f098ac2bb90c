//! Structural content model produced by document converters.
//!
//! The model is deliberately small: the blocks a clinical letter or report
//! actually uses (headings, paragraphs, lists, tables) and inline runs with
//! bold/italic marks, line breaks and embedded images.

/// A converted document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of embedded images anywhere in the document.
    pub fn image_count(&self) -> usize {
        self.blocks.iter().map(Block::image_count).sum()
    }
}

/// A block-level element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Heading with level 1..=6.
    Heading { level: u8, inlines: Vec<Inline> },
    Paragraph(Vec<Inline>),
    List(List),
    Table(Table),
}

impl Block {
    fn image_count(&self) -> usize {
        match self {
            Block::Heading { inlines, .. } | Block::Paragraph(inlines) => inline_images(inlines),
            Block::List(list) => list.image_count(),
            Block::Table(table) => table
                .rows
                .iter()
                .flat_map(|row| row.iter())
                .flat_map(|cell| cell.blocks.iter())
                .map(Block::image_count)
                .sum(),
        }
    }
}

fn inline_images(inlines: &[Inline]) -> usize {
    inlines
        .iter()
        .filter(|inline| matches!(inline, Inline::Image(_)))
        .count()
}

/// An ordered or unordered list. Nested lists hang off their parent item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

impl List {
    fn image_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| {
                inline_images(&item.inlines)
                    + item.children.iter().map(List::image_count).sum::<usize>()
            })
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub inlines: Vec<Inline>,
    pub children: Vec<List>,
}

/// A table as rows of cells. The first row is treated as the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<TableCell>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub blocks: Vec<Block>,
}

/// An inline element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(TextRun),
    LineBreak,
    Image(EmbeddedImage),
}

impl Inline {
    /// Plain text run without marks.
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(TextRun {
            text: text.into(),
            bold: false,
            italic: false,
        })
    }
}

/// A run of text sharing the same marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

/// Binary image data embedded in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub content_type: String,
    pub data: Vec<u8>,
}
