//! Allow-list copy of parsed HTML.
//!
//! html5ever builds a full DOM; only allow-listed elements and attributes are
//! copied out of it into an owned tree. Nothing in the input is executed and
//! no attribute outside the list survives, so event handlers and inline
//! styles are gone before the importer ever runs.

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use url::Url;

/// Elements the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Heading(u8),
    Paragraph,
    UnorderedList,
    OrderedList,
    ListItem,
    Table,
    TableHead,
    TableBody,
    TableRow,
    HeaderCell,
    Cell,
    Image,
    Anchor,
    Strong,
    Emphasis,
    Strike,
    Code,
    Pre,
    Blockquote,
    LineBreak,
    /// A block-level wrapper such as `div` or `section`. Its boundaries
    /// separate paragraphs but it carries no meaning of its own.
    Container,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizedNode {
    Text(String),
    Element(SanitizedElement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedElement {
    tag: Tag,
    href: Option<String>,
    src: Option<String>,
    alt: Option<String>,
    children: Vec<SanitizedNode>,
}

impl SanitizedElement {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Link target of an `a`, already limited to http(s) or relative URLs.
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn alt(&self) -> Option<&str> {
        self.alt.as_deref()
    }

    pub fn children(&self) -> &[SanitizedNode] {
        &self.children
    }
}

/// HTML that has been through [`sanitize_html`]. There is no other way to
/// build one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedFragment {
    nodes: Vec<SanitizedNode>,
}

impl SanitizedFragment {
    pub fn nodes(&self) -> &[SanitizedNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

enum Disposition {
    Keep(Tag),
    Drop,
    Unwrap,
}

fn classify(name: &str) -> Disposition {
    match name {
        "h1" => Disposition::Keep(Tag::Heading(1)),
        "h2" => Disposition::Keep(Tag::Heading(2)),
        "h3" => Disposition::Keep(Tag::Heading(3)),
        "h4" => Disposition::Keep(Tag::Heading(4)),
        "h5" => Disposition::Keep(Tag::Heading(5)),
        "h6" => Disposition::Keep(Tag::Heading(6)),
        "p" => Disposition::Keep(Tag::Paragraph),
        "ul" => Disposition::Keep(Tag::UnorderedList),
        "ol" => Disposition::Keep(Tag::OrderedList),
        "li" => Disposition::Keep(Tag::ListItem),
        "table" => Disposition::Keep(Tag::Table),
        "thead" => Disposition::Keep(Tag::TableHead),
        "tbody" => Disposition::Keep(Tag::TableBody),
        "tr" => Disposition::Keep(Tag::TableRow),
        "th" => Disposition::Keep(Tag::HeaderCell),
        "td" => Disposition::Keep(Tag::Cell),
        "img" => Disposition::Keep(Tag::Image),
        "a" => Disposition::Keep(Tag::Anchor),
        "strong" | "b" => Disposition::Keep(Tag::Strong),
        "em" | "i" => Disposition::Keep(Tag::Emphasis),
        "s" | "del" => Disposition::Keep(Tag::Strike),
        "code" => Disposition::Keep(Tag::Code),
        "pre" => Disposition::Keep(Tag::Pre),
        "blockquote" => Disposition::Keep(Tag::Blockquote),
        "br" => Disposition::Keep(Tag::LineBreak),
        "div" | "section" | "article" | "main" | "header" | "footer" | "aside" | "nav"
        | "figure" | "figcaption" => Disposition::Keep(Tag::Container),
        "script" | "style" | "iframe" | "object" | "embed" | "noscript" | "template" | "svg"
        | "math" | "head" | "title" | "form" | "button" | "select" | "textarea" => {
            Disposition::Drop
        }
        _ => Disposition::Unwrap,
    }
}

/// Only `http`, `https` and relative references are allowed through.
fn safe_url(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(value.to_string()),
        Ok(url) => {
            tracing::debug!(scheme = url.scheme(), "dropping url with disallowed scheme");
            None
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => Some(value.to_string()),
        Err(err) => {
            tracing::debug!(%err, "dropping unparseable url");
            None
        }
    }
}

/// Kept elements nest at most this deep. Anything below is unwrapped into its
/// deepest kept ancestor, so the copied tree stays shallow however deep the
/// input goes.
pub const MAX_DEPTH: usize = 128;

/// Parse `html` and keep only the allow-listed structure.
pub fn sanitize_html(html: &str) -> SanitizedFragment {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .one(StrTendril::from_slice(html));

    let mut nodes = Vec::new();
    let mut stack = vec![Frame::new(None, &dom.document)];
    let mut flattened = 0usize;

    loop {
        let depth = stack.len().saturating_sub(1);
        let Some(frame) = stack.last_mut() else {
            break;
        };
        let Some(handle) = frame.pending.pop() else {
            if let Some(Frame {
                element: Some(element),
                ..
            }) = stack.pop()
            {
                push_node(&mut stack, &mut nodes, SanitizedNode::Element(element));
            }
            continue;
        };

        match &handle.data {
            NodeData::Document => frame.schedule_children(&handle),
            NodeData::Text { contents } => {
                let text = contents.borrow();
                if !text.is_empty() {
                    push_node(&mut stack, &mut nodes, SanitizedNode::Text(text.to_string()));
                }
            }
            NodeData::Element { name, attrs, .. } => {
                let local: &str = &name.local;
                match classify(local) {
                    Disposition::Drop => {
                        tracing::trace!(element = local, "dropping element subtree");
                    }
                    Disposition::Unwrap => frame.schedule_children(&handle),
                    Disposition::Keep(_) if depth >= MAX_DEPTH => {
                        flattened += 1;
                        frame.schedule_children(&handle);
                    }
                    Disposition::Keep(tag) => {
                        let mut element = SanitizedElement {
                            tag,
                            href: None,
                            src: None,
                            alt: None,
                            children: Vec::new(),
                        };
                        for attr in attrs.borrow().iter() {
                            let value: &str = &attr.value;
                            match (tag, &*attr.name.local) {
                                (Tag::Anchor, "href") => element.href = safe_url(value),
                                (Tag::Image, "src") => element.src = safe_url(value),
                                (Tag::Image, "alt") => element.alt = Some(value.to_string()),
                                _ => {}
                            }
                        }
                        stack.push(Frame::new(Some(element), &handle));
                    }
                }
            }
            NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    if flattened > 0 {
        tracing::warn!(flattened, max_depth = MAX_DEPTH, "flattened elements nested too deeply");
    }
    SanitizedFragment { nodes }
}

/// An element being copied, with the source nodes still to visit.
struct Frame {
    /// `None` for the document itself.
    element: Option<SanitizedElement>,
    /// Popped from the end, so stored in reverse document order.
    pending: Vec<Handle>,
}

impl Frame {
    fn new(element: Option<SanitizedElement>, handle: &Handle) -> Self {
        let mut frame = Self {
            element,
            pending: Vec::new(),
        };
        frame.schedule_children(handle);
        frame
    }

    /// Visit `handle`'s children next, ahead of anything already pending.
    fn schedule_children(&mut self, handle: &Handle) {
        self.pending
            .extend(handle.children.borrow().iter().rev().cloned());
    }
}

fn push_node(stack: &mut [Frame], nodes: &mut Vec<SanitizedNode>, node: SanitizedNode) {
    match stack.last_mut().and_then(|frame| frame.element.as_mut()) {
        Some(parent) => parent.children.push(node),
        None => nodes.push(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_all(nodes: &[SanitizedNode], tag: Tag) -> Vec<&SanitizedElement> {
        let mut found = Vec::new();
        for node in nodes {
            if let SanitizedNode::Element(element) = node {
                if element.tag == tag {
                    found.push(element);
                }
                found.extend(find_all(&element.children, tag));
            }
        }
        found
    }

    fn all_text(nodes: &[SanitizedNode]) -> String {
        let mut text = String::new();
        for node in nodes {
            match node {
                SanitizedNode::Text(t) => text.push_str(t),
                SanitizedNode::Element(e) => text.push_str(&all_text(&e.children)),
            }
        }
        text
    }

    #[test]
    fn scripts_and_styles_vanish() {
        let fragment = sanitize_html(
            "<p>Hello</p><script>alert('pwned')</script><style>p{color:red}</style><noscript>x</noscript>",
        );
        let text = all_text(fragment.nodes());
        assert_eq!(text, "Hello");
    }

    #[test]
    fn event_handlers_are_not_copied() {
        let fragment =
            sanitize_html(r#"<p onclick="steal()"><a href="https://example.com" onmouseover="x()">ok</a></p>"#);
        let anchors = find_all(fragment.nodes(), Tag::Anchor);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].href(), Some("https://example.com"));
        assert!(!format!("{fragment:?}").contains("steal"));
    }

    #[test]
    fn javascript_urls_are_dropped() {
        let fragment = sanitize_html(
            r#"<a href="javascript:alert(1)">a</a><a href=" JaVaScRiPt:alert(1)">b</a><img src="data:image/svg+xml,x"><a href="/relative">c</a>"#,
        );
        let anchors = find_all(fragment.nodes(), Tag::Anchor);
        let hrefs: Vec<Option<&str>> = anchors.iter().map(|a| a.href()).collect();
        assert_eq!(hrefs, vec![None, None, Some("/relative")]);
        assert_eq!(find_all(fragment.nodes(), Tag::Image)[0].src(), None);
    }

    #[test]
    fn unknown_inline_elements_unwrap() {
        let fragment = sanitize_html("<p><span class=\"x\">in <font>side</font></span></p>");
        let paragraphs = find_all(fragment.nodes(), Tag::Paragraph);
        assert_eq!(
            paragraphs[0].children(),
            &[
                SanitizedNode::Text("in ".into()),
                SanitizedNode::Text("side".into())
            ]
        );
    }

    fn depth(nodes: &[SanitizedNode]) -> usize {
        nodes
            .iter()
            .map(|node| match node {
                SanitizedNode::Text(_) => 0,
                SanitizedNode::Element(e) => 1 + depth(&e.children),
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn deep_nesting_is_flattened() {
        let html = format!("{}deep{}", "<div>".repeat(20_000), "</div>".repeat(20_000));
        let fragment = sanitize_html(&html);
        assert_eq!(all_text(fragment.nodes()), "deep");
        assert!(depth(fragment.nodes()) <= MAX_DEPTH);
    }

    #[test]
    fn flattening_keeps_document_order() {
        let html = format!(
            "{}<b>a</b>b<i>c</i>{}<p>after</p>",
            "<section>".repeat(MAX_DEPTH + 5),
            "</section>".repeat(MAX_DEPTH + 5)
        );
        let fragment = sanitize_html(&html);
        assert_eq!(all_text(fragment.nodes()), "abcafter");
    }

    #[test]
    fn comments_and_head_are_dropped() {
        let fragment = sanitize_html(
            "<html><head><title>T</title></head><body><!-- secret --><p>x</p></body></html>",
        );
        assert_eq!(all_text(fragment.nodes()), "x");
    }
}
