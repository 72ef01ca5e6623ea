//! Sanitized HTML to canonical blocks.

use super::sanitize::{SanitizedElement, SanitizedFragment, SanitizedNode, Tag, sanitize_html};
use crate::blocks::{
    BlockBody, BlockId, ContentBlock, HeadingBlock, HeadingLevel, ImageBlock, ListBlock,
    ListType, TableBlock, TextBlock,
};

/// Sanitize `html` and import it. Ids are `html-0`, `html-1`, ...
pub fn html_to_blocks(html: &str) -> Vec<ContentBlock> {
    blocks_from_sanitized(&sanitize_html(html))
}

pub fn blocks_from_sanitized(fragment: &SanitizedFragment) -> Vec<ContentBlock> {
    let mut importer = Importer::default();
    importer.walk(fragment.nodes());
    importer.flush_inline();
    importer.blocks
}

#[derive(Default)]
struct Importer {
    blocks: Vec<ContentBlock>,
    /// Inline content met outside any paragraph, waiting for a block boundary.
    pending: String,
}

impl Importer {
    fn push(&mut self, body: BlockBody) {
        let id = BlockId::sequential("html", self.blocks.len());
        tracing::trace!(%id, kind = body.kind(), "html block");
        self.blocks.push(ContentBlock::new(id, body));
    }

    fn push_text(&mut self, markers: &str) {
        let content = tidy(markers);
        if !content.is_empty() {
            self.push(BlockBody::Text(TextBlock { content }));
        }
    }

    fn flush_inline(&mut self) {
        if !self.pending.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            self.push_text(&pending);
        }
    }

    fn walk(&mut self, nodes: &[SanitizedNode]) {
        for node in nodes {
            match node {
                SanitizedNode::Text(text) => push_source_text(&mut self.pending, text),
                SanitizedNode::Element(element) => self.element(element),
            }
        }
    }

    fn element(&mut self, element: &SanitizedElement) {
        match element.tag() {
            Tag::Strong | Tag::Emphasis | Tag::Strike | Tag::Anchor | Tag::LineBreak => {
                render_inline_element(element, &mut self.pending);
                let images = find_images(element.children());
                if !images.is_empty() {
                    self.flush_inline();
                    self.images(images);
                }
            }
            // Code in the middle of loose inline text stays inline.
            Tag::Code
                if !self.pending.trim().is_empty() && !contains_line_break(element.children()) =>
            {
                render_inline_element(element, &mut self.pending);
            }
            Tag::Code | Tag::Pre => {
                self.flush_inline();
                let code = raw_text(element.children());
                self.push(BlockBody::Text(TextBlock::fenced("", code.trim_matches('\n'))));
            }
            Tag::Heading(depth) => {
                self.flush_inline();
                let content = tidy(&render_inline(element.children())).replace('\n', " ");
                if content.is_empty() {
                    tracing::debug!("dropping empty heading");
                } else {
                    self.push(BlockBody::Heading(HeadingBlock {
                        content,
                        level: HeadingLevel::clamped(usize::from(depth)),
                    }));
                }
                self.images(find_images(element.children()));
            }
            Tag::Paragraph => {
                self.flush_inline();
                self.paragraph(element);
            }
            Tag::UnorderedList | Tag::OrderedList => {
                self.flush_inline();
                self.list(element);
                self.images(find_images(element.children()));
            }
            Tag::Table => {
                self.flush_inline();
                self.table(element);
                self.images(find_images(element.children()));
            }
            Tag::Image => {
                self.flush_inline();
                self.image(element);
            }
            Tag::Blockquote => {
                self.flush_inline();
                let mut lines = Vec::new();
                collect_lines(element.children(), &mut lines);
                let content = lines.join("\n");
                if !content.is_empty() {
                    self.push(BlockBody::Quote(TextBlock { content }));
                }
                self.images(find_images(element.children()));
            }
            Tag::Container
            | Tag::ListItem
            | Tag::TableHead
            | Tag::TableBody
            | Tag::TableRow
            | Tag::HeaderCell
            | Tag::Cell => {
                self.flush_inline();
                self.walk(element.children());
                self.flush_inline();
            }
        }
    }

    /// A paragraph holding nothing but an image becomes an image block.
    /// Images mixed with text follow the paragraph as their own blocks.
    fn paragraph(&mut self, element: &SanitizedElement) {
        let images = find_images(element.children());
        let text = tidy(&render_inline(element.children()));

        if !text.is_empty() {
            self.push(BlockBody::Text(TextBlock { content: text }));
        } else if images.is_empty() {
            tracing::trace!("dropping empty paragraph");
        }
        self.images(images);
    }

    /// Images found inside text-bearing blocks follow them as image blocks.
    fn images(&mut self, images: Vec<&SanitizedElement>) {
        for image in images {
            self.image(image);
        }
    }

    fn image(&mut self, element: &SanitizedElement) {
        let Some(src) = element.src() else {
            tracing::warn!("dropping image without a usable src");
            return;
        };
        self.push(BlockBody::Image(ImageBlock {
            image_url: src.to_string(),
            alt_text: element.alt().unwrap_or_default().trim().to_string(),
            ..Default::default()
        }));
    }

    /// Nested lists are flattened into the outer list.
    fn list(&mut self, element: &SanitizedElement) {
        let list_type = match element.tag() {
            Tag::OrderedList => ListType::Numbered,
            _ => ListType::Bullet,
        };
        let mut items = Vec::new();
        collect_list_items(element.children(), &mut items);
        if items.is_empty() {
            tracing::debug!("dropping empty list");
            return;
        }
        self.push(BlockBody::List(ListBlock { list_type, items }));
    }

    /// Rows are padded or cut to the first row's width.
    fn table(&mut self, element: &SanitizedElement) {
        let mut rows = Vec::new();
        collect_rows(element.children(), &mut rows);
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            tracing::debug!("dropping empty table");
            return;
        }
        for row in &mut rows {
            row.resize(width, String::new());
        }
        self.push(BlockBody::Table(TableBlock { table_data: rows }));
    }
}

fn collect_list_items(nodes: &[SanitizedNode], items: &mut Vec<String>) {
    for node in nodes {
        let SanitizedNode::Element(element) = node else {
            continue;
        };
        match element.tag() {
            Tag::ListItem => {
                let mut rendered = String::new();
                for child in element.children().iter().filter(|child| !is_list(child)) {
                    render_node(child, &mut rendered);
                }
                let text = tidy(&rendered).replace('\n', " ");
                if !text.is_empty() {
                    items.push(text);
                }
                collect_list_items(element.children(), items);
            }
            Tag::UnorderedList | Tag::OrderedList => {
                collect_list_items(element.children(), items)
            }
            _ => {}
        }
    }
}

fn is_list(node: &SanitizedNode) -> bool {
    matches!(
        node,
        SanitizedNode::Element(element)
            if matches!(element.tag(), Tag::UnorderedList | Tag::OrderedList)
    )
}

fn collect_rows(nodes: &[SanitizedNode], rows: &mut Vec<Vec<String>>) {
    for node in nodes {
        let SanitizedNode::Element(element) = node else {
            continue;
        };
        match element.tag() {
            Tag::TableRow => {
                let cells: Vec<String> = element
                    .children()
                    .iter()
                    .filter_map(|cell| match cell {
                        SanitizedNode::Element(cell)
                            if matches!(cell.tag(), Tag::HeaderCell | Tag::Cell) =>
                        {
                            Some(tidy(&render_inline(cell.children())).replace('\n', " "))
                        }
                        _ => None,
                    })
                    .collect();
                if !cells.is_empty() {
                    rows.push(cells);
                }
            }
            Tag::TableHead | Tag::TableBody => collect_rows(element.children(), rows),
            _ => {}
        }
    }
}

/// Quote text: one line per block child, inline runs joined.
fn collect_lines(nodes: &[SanitizedNode], lines: &mut Vec<String>) {
    let mut inline = String::new();
    for node in nodes {
        match node {
            SanitizedNode::Text(text) => push_source_text(&mut inline, text),
            SanitizedNode::Element(element) => match element.tag() {
                Tag::Paragraph | Tag::Heading(_) | Tag::ListItem | Tag::Pre => {
                    push_line(lines, &std::mem::take(&mut inline));
                    push_line(lines, &render_inline(element.children()));
                }
                Tag::Container | Tag::Blockquote | Tag::UnorderedList | Tag::OrderedList => {
                    push_line(lines, &std::mem::take(&mut inline));
                    collect_lines(element.children(), lines);
                }
                _ => render_inline_element(element, &mut inline),
            },
        }
    }
    push_line(lines, &inline);
}

fn push_line(lines: &mut Vec<String>, markers: &str) {
    let line = tidy(markers);
    if !line.is_empty() {
        lines.push(line);
    }
}

fn find_images(nodes: &[SanitizedNode]) -> Vec<&SanitizedElement> {
    let mut found = Vec::new();
    for node in nodes {
        if let SanitizedNode::Element(element) = node {
            if element.tag() == Tag::Image {
                found.push(element);
            } else {
                found.extend(find_images(element.children()));
            }
        }
    }
    found
}

fn contains_line_break(nodes: &[SanitizedNode]) -> bool {
    nodes.iter().any(|node| match node {
        SanitizedNode::Text(text) => text.contains('\n'),
        SanitizedNode::Element(element) => {
            element.tag() == Tag::LineBreak || contains_line_break(element.children())
        }
    })
}

/// Text exactly as written, for code.
fn raw_text(nodes: &[SanitizedNode]) -> String {
    let mut text = String::new();
    for node in nodes {
        match node {
            SanitizedNode::Text(t) => text.push_str(t),
            SanitizedNode::Element(element) if element.tag() == Tag::LineBreak => text.push('\n'),
            SanitizedNode::Element(element) => text.push_str(&raw_text(element.children())),
        }
    }
    text
}

/// Source newlines are formatting, not content; only `<br>` breaks a line.
fn push_source_text(out: &mut String, text: &str) {
    out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
}

/// Inline content as marker text. Whitespace is left for [`tidy`].
fn render_inline(nodes: &[SanitizedNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, &mut out);
    }
    out
}

fn render_node(node: &SanitizedNode, out: &mut String) {
    match node {
        SanitizedNode::Text(text) => push_source_text(out, text),
        SanitizedNode::Element(element) => render_inline_element(element, out),
    }
}

fn render_inline_element(element: &SanitizedElement, out: &mut String) {
    match element.tag() {
        Tag::Strong => wrap(out, "**", &render_inline(element.children())),
        Tag::Emphasis => wrap(out, "*", &render_inline(element.children())),
        Tag::Strike => wrap(out, "~~", &render_inline(element.children())),
        Tag::Code => {
            let code = collapse_whitespace(&raw_text(element.children()));
            wrap(out, "`", &code);
        }
        Tag::LineBreak => out.push('\n'),
        // Lifted out into image blocks by the importer.
        Tag::Image => {}
        Tag::Anchor => {
            let label = tidy(&render_inline(element.children())).replace('\n', " ");
            match element.href() {
                // A linked image becomes an image block; the link is dropped.
                Some(_) if label.is_empty() && !find_images(element.children()).is_empty() => {}
                Some(href) if label.is_empty() => {
                    out.push_str(&format!("[{href}]({href})"));
                }
                Some(href) => out.push_str(&format!("[{label}]({href})")),
                None => out.push_str(&label),
            }
        }
        _ => {
            out.push(' ');
            out.push_str(&render_inline(element.children()));
            out.push(' ');
        }
    }
}

/// Markers hug the text; surrounding whitespace stays outside them.
fn wrap(out: &mut String, marker: &str, inner: &str) {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        out.push_str(inner);
        return;
    }
    if inner.starts_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(marker);
    out.push_str(trimmed);
    out.push_str(marker);
    if inner.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace within each line and drop blank lines.
fn tidy(markers: &str) -> String {
    markers
        .split('\n')
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
