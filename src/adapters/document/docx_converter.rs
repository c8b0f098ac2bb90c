//! DOCX converter built on docx-rs.
//!
//! Walks the document body into the content model:
//!
//! - `Heading1`..`Heading6` and `Title` paragraph styles become headings
//! - consecutive numbered paragraphs become (nested) ordered or bullet lists
//! - tables keep their row/cell structure, including nested tables
//! - bold/italic run marks, breaks and tabs are preserved
//! - embedded pictures are resolved against the package media
//!
//! docx-rs can panic on malformed packages, so the whole conversion runs
//! under `catch_unwind`.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::ingestion::model::{
    Block, Document, EmbeddedImage, Inline, List, ListItem, Table, TableCell, TextRun,
};
use crate::ports::{Conversion, ConversionError, DocumentConverter};

/// Converts `.docx` packages with docx-rs.
#[derive(Debug, Clone, Default)]
pub struct DocxConverter;

impl DocxConverter {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentConverter for DocxConverter {
    fn convert(&self, bytes: &[u8]) -> Result<Conversion, ConversionError> {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| convert_package(bytes))) {
            Ok(result) => result,
            Err(_panic) => {
                tracing::error!(size = bytes.len(), "DOCX conversion panicked on malformed package");
                Err(ConversionError::ConverterPanicked(
                    "malformed document package".to_string(),
                ))
            }
        }
    }
}

fn convert_package(bytes: &[u8]) -> Result<Conversion, ConversionError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| ConversionError::invalid_document(format!("Failed to parse DOCX: {}", e)))?;

    let mut walker = Walker::new(&docx);
    let mut pending_list = Vec::new();

    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                if let Some(entry) = walker.list_entry(para) {
                    pending_list.push(entry);
                    continue;
                }
                walker.flush_list(&mut pending_list);
                let block = walker.paragraph_block(para);
                walker.blocks.push(block);
            }
            docx_rs::DocumentChild::Table(table) => {
                walker.flush_list(&mut pending_list);
                let block = Block::Table(walker.table(table));
                walker.blocks.push(block);
            }
            _ => {}
        }
    }
    walker.flush_list(&mut pending_list);

    let Walker {
        blocks, warnings, ..
    } = walker;

    Ok(Conversion {
        document: Document::new(blocks),
        warnings,
    })
}

/// A numbered paragraph waiting to be grouped into a list.
struct ListEntry {
    level: usize,
    ordered: bool,
    inlines: Vec<Inline>,
}

struct Walker {
    /// rId → (content type, bytes)
    images: HashMap<String, (String, Vec<u8>)>,
    /// (numId, level) → ordered
    numbering_formats: HashMap<(usize, usize), bool>,
    blocks: Vec<Block>,
    warnings: Vec<String>,
}

impl Walker {
    fn new(docx: &docx_rs::Docx) -> Self {
        let images = docx
            .images
            .iter()
            .map(|(id, path, image, _png)| {
                let content_type = mime_guess::from_path(path)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string();
                (id.clone(), (content_type, image.0.clone()))
            })
            .collect();

        let abstract_formats: HashMap<(usize, usize), bool> = docx
            .numberings
            .abstract_nums
            .iter()
            .flat_map(|abstract_num| {
                abstract_num.levels.iter().map(move |level| {
                    ((abstract_num.id, level.level), level.format.val != "bullet")
                })
            })
            .collect();

        let numbering_formats = docx
            .numberings
            .numberings
            .iter()
            .flat_map(|numbering| {
                let abstract_formats = &abstract_formats;
                (0..9).filter_map(move |level| {
                    abstract_formats
                        .get(&(numbering.abstract_num_id, level))
                        .map(|ordered| ((numbering.id, level), *ordered))
                })
            })
            .collect();

        Self {
            images,
            numbering_formats,
            blocks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn list_entry(&mut self, para: &docx_rs::Paragraph) -> Option<ListEntry> {
        let numbering = para.property.numbering_property.as_ref()?;
        let num_id = numbering.id.as_ref()?.id;
        // numId 0 explicitly removes numbering
        if num_id == 0 {
            return None;
        }
        let level = numbering.level.as_ref().map(|level| level.val).unwrap_or(0);
        let ordered = self
            .numbering_formats
            .get(&(num_id, level))
            .copied()
            .unwrap_or(false);

        Some(ListEntry {
            level,
            ordered,
            inlines: self.inlines(para),
        })
    }

    fn flush_list(&mut self, entries: &mut Vec<ListEntry>) {
        if entries.is_empty() {
            return;
        }
        let mut index = 0;
        while index < entries.len() {
            let level = entries[index].level;
            let list = build_list(entries, &mut index, level);
            self.blocks.push(Block::List(list));
        }
        entries.clear();
    }

    fn paragraph_block(&mut self, para: &docx_rs::Paragraph) -> Block {
        let inlines = self.inlines(para);
        match para.property.style.as_ref().and_then(|style| heading_level(&style.val)) {
            Some(level) => Block::Heading { level, inlines },
            None => Block::Paragraph(inlines),
        }
    }

    fn table(&mut self, table: &docx_rs::Table) -> Table {
        let mut rows = Vec::new();
        for row in &table.rows {
            let docx_rs::TableChild::TableRow(tr) = row;
            let mut cells = Vec::new();
            for cell in &tr.cells {
                let docx_rs::TableRowChild::TableCell(tc) = cell;
                let mut blocks = Vec::new();
                for content in &tc.children {
                    match content {
                        docx_rs::TableCellContent::Paragraph(para) => {
                            blocks.push(self.paragraph_block(para));
                        }
                        docx_rs::TableCellContent::Table(nested) => {
                            blocks.push(Block::Table(self.table(nested)));
                        }
                        _ => {}
                    }
                }
                cells.push(TableCell { blocks });
            }
            rows.push(cells);
        }
        Table { rows }
    }

    fn inlines(&mut self, para: &docx_rs::Paragraph) -> Vec<Inline> {
        let mut inlines = Vec::new();
        for child in &para.children {
            self.paragraph_child(child, &mut inlines);
        }
        inlines
    }

    fn paragraph_child(&mut self, child: &docx_rs::ParagraphChild, out: &mut Vec<Inline>) {
        match child {
            docx_rs::ParagraphChild::Run(run) => self.run(run, out),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for nested in &link.children {
                    self.paragraph_child(nested, out);
                }
            }
            _ => {}
        }
    }

    fn run(&mut self, run: &docx_rs::Run, out: &mut Vec<Inline>) {
        let bold = flag(&run.run_property.bold);
        let italic = flag(&run.run_property.italic);

        for child in &run.children {
            match child {
                docx_rs::RunChild::Text(text) => push_text(out, &text.text, bold, italic),
                docx_rs::RunChild::Tab(_) => push_text(out, "\t", bold, italic),
                docx_rs::RunChild::Break(_) => out.push(Inline::LineBreak),
                docx_rs::RunChild::Drawing(drawing) => match &drawing.data {
                    Some(docx_rs::DrawingData::Pic(pic)) => {
                        if let Some(image) = self.resolve_image(pic) {
                            out.push(Inline::Image(image));
                        }
                    }
                    Some(_) => self
                        .warnings
                        .push("Unsupported drawing (text box or shape) was skipped".to_string()),
                    None => {}
                },
                _ => {}
            }
        }
    }

    fn resolve_image(&mut self, pic: &docx_rs::Pic) -> Option<EmbeddedImage> {
        if let Some((content_type, data)) = self.images.get(&pic.id) {
            return Some(EmbeddedImage {
                content_type: content_type.clone(),
                data: data.clone(),
            });
        }
        if !pic.image.is_empty() {
            return Some(EmbeddedImage {
                content_type: "image/png".to_string(),
                data: pic.image.clone(),
            });
        }
        self.warnings
            .push(format!("Image '{}' could not be found in the document", pic.id));
        None
    }
}

/// Merges adjacent runs with identical marks.
fn push_text(out: &mut Vec<Inline>, text: &str, bold: bool, italic: bool) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = out.last_mut() {
        if last.bold == bold && last.italic == italic {
            last.text.push_str(text);
            return;
        }
    }
    out.push(Inline::Text(TextRun {
        text: text.to_string(),
        bold,
        italic,
    }));
}

/// Reads a boolean run property (bold, italic...) through its serialized form.
fn flag<T: Serialize>(property: &Option<T>) -> bool {
    property
        .as_ref()
        .and_then(|value| serde_json::to_value(value).ok())
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

fn heading_level(style: &str) -> Option<u8> {
    if style.eq_ignore_ascii_case("title") {
        return Some(1);
    }
    let normalized = style.to_ascii_lowercase().replace(' ', "");
    let level = normalized.strip_prefix("heading")?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Groups entries starting at `index` into a list at `level`. Deeper entries
/// nest under the preceding item; a shallower entry ends the list.
fn build_list(entries: &[ListEntry], index: &mut usize, level: usize) -> List {
    let ordered = entries[*index].ordered;
    let mut items: Vec<ListItem> = Vec::new();

    while *index < entries.len() {
        let entry = &entries[*index];
        if entry.level < level {
            break;
        }
        if entry.level > level {
            let child = build_list(entries, index, entry.level);
            match items.last_mut() {
                Some(parent) => parent.children.push(child),
                None => items.push(ListItem {
                    inlines: Vec::new(),
                    children: vec![child],
                }),
            }
            continue;
        }
        items.push(ListItem {
            inlines: entry.inlines.clone(),
            children: Vec::new(),
        });
        *index += 1;
    }

    List { ordered, items }
}
