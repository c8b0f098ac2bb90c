//! Rendering of the content model to read-only HTML and to raw text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::model::{Block, Document, EmbeddedImage, Inline, List, Table};

/// CSS classes applied per element.
///
/// The defaults are utility classes that give bordered tables, shaded
/// header cells and spaced headings when rendered by the preview pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMap {
    pub table: String,
    pub td: String,
    pub th: String,
    pub p: String,
    pub h1: String,
    pub h2: String,
    pub h3: String,
    pub ul: String,
    pub ol: String,
    pub li: String,
}

impl Default for StyleMap {
    fn default() -> Self {
        Self {
            table: "table table-auto border-collapse border border-gray-300".to_string(),
            td: "border border-gray-300 px-2 py-1".to_string(),
            th: "border border-gray-300 px-2 py-1 bg-gray-100 font-semibold".to_string(),
            p: "mb-2".to_string(),
            h1: "text-2xl font-bold mb-4".to_string(),
            h2: "text-xl font-semibold mb-3".to_string(),
            h3: "text-lg font-semibold mb-2".to_string(),
            ul: "list-disc ml-4 mb-2".to_string(),
            ol: "list-decimal ml-4 mb-2".to_string(),
            li: "mb-1".to_string(),
        }
    }
}

impl StyleMap {
    fn heading_class(&self, level: u8) -> &str {
        match level {
            1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            _ => "",
        }
    }
}

/// Renders a document to an HTML fragment with the given style map.
pub fn render_html(document: &Document, styles: &StyleMap) -> String {
    let mut out = String::new();
    for block in &document.blocks {
        push_block(&mut out, block, styles);
    }
    out
}

/// Renders a document to raw text: one paragraph per line group,
/// separated by blank lines. Images are dropped.
pub fn render_text(document: &Document) -> String {
    let mut paragraphs = Vec::new();
    for block in &document.blocks {
        collect_text(block, &mut paragraphs);
    }
    paragraphs.join("\n\n")
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `data:` URL for binary content.
pub fn data_url(content_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(data))
}

fn open_tag(out: &mut String, tag: &str, class: &str) {
    if class.is_empty() {
        out.push_str(&format!("<{}>", tag));
    } else {
        out.push_str(&format!("<{} class=\"{}\">", tag, html_escape(class)));
    }
}

fn push_block(out: &mut String, block: &Block, styles: &StyleMap) {
    match block {
        Block::Heading { level, inlines } => {
            let level = (*level).clamp(1, 6);
            let tag = format!("h{}", level);
            open_tag(out, &tag, styles.heading_class(level));
            push_inlines(out, inlines);
            out.push_str(&format!("</{}>", tag));
        }
        Block::Paragraph(inlines) => {
            open_tag(out, "p", &styles.p);
            push_inlines(out, inlines);
            out.push_str("</p>");
        }
        Block::List(list) => push_list(out, list, styles),
        Block::Table(table) => push_table(out, table, styles),
    }
}

fn push_list(out: &mut String, list: &List, styles: &StyleMap) {
    let (tag, class) = if list.ordered {
        ("ol", &styles.ol)
    } else {
        ("ul", &styles.ul)
    };
    open_tag(out, tag, class);
    for item in &list.items {
        open_tag(out, "li", &styles.li);
        push_inlines(out, &item.inlines);
        for child in &item.children {
            push_list(out, child, styles);
        }
        out.push_str("</li>");
    }
    out.push_str(&format!("</{}>", tag));
}

fn push_table(out: &mut String, table: &Table, styles: &StyleMap) {
    // A single-row table has no header.
    let has_header = table.rows.len() > 1;

    open_tag(out, "table", &styles.table);
    for (index, row) in table.rows.iter().enumerate() {
        let (cell_tag, cell_class) = if has_header && index == 0 {
            ("th", &styles.th)
        } else {
            ("td", &styles.td)
        };
        out.push_str("<tr>");
        for cell in row {
            open_tag(out, cell_tag, cell_class);
            for block in &cell.blocks {
                push_block(out, block, styles);
            }
            out.push_str(&format!("</{}>", cell_tag));
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
}

fn push_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(run) => {
                let text = html_escape(&run.text);
                match (run.bold, run.italic) {
                    (true, true) => out.push_str(&format!("<strong><em>{}</em></strong>", text)),
                    (true, false) => out.push_str(&format!("<strong>{}</strong>", text)),
                    (false, true) => out.push_str(&format!("<em>{}</em>", text)),
                    (false, false) => out.push_str(&text),
                }
            }
            Inline::LineBreak => out.push_str("<br />"),
            Inline::Image(image) => push_image(out, image),
        }
    }
}

fn push_image(out: &mut String, image: &EmbeddedImage) {
    out.push_str(&format!(
        "<img src=\"{}\" />",
        data_url(&image.content_type, &image.data)
    ));
}

fn inline_text(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(run) => run.text.as_str(),
            Inline::LineBreak => "\n",
            Inline::Image(_) => "",
        })
        .collect()
}

fn collect_text(block: &Block, paragraphs: &mut Vec<String>) {
    match block {
        Block::Heading { inlines, .. } | Block::Paragraph(inlines) => {
            paragraphs.push(inline_text(inlines));
        }
        Block::List(list) => collect_list_text(list, paragraphs),
        Block::Table(table) => {
            for cell in table.rows.iter().flatten() {
                for block in &cell.blocks {
                    collect_text(block, paragraphs);
                }
            }
        }
    }
}

fn collect_list_text(list: &List, paragraphs: &mut Vec<String>) {
    for item in &list.items {
        paragraphs.push(inline_text(&item.inlines));
        for child in &item.children {
            collect_list_text(child, paragraphs);
        }
    }
}
