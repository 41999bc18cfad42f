use std::borrow::Cow;

use crate::document::{Align, BlockKind, BlockNode, Document, Node, TextNode};

/// Inline style of a leaf. Absent and explicitly-false marks are the same
/// here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeafStyle {
    pub bold: bool,
    pub italics: bool,
    pub underline: bool,
}

impl LeafStyle {
    pub fn of(text: &TextNode) -> Self {
        Self {
            bold: text.bold == Some(true),
            italics: text.italics == Some(true),
            underline: text.underline == Some(true),
        }
    }

    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }

    /// CSS declarations, in a fixed order.
    pub fn directives(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.bold {
            out.push("font-weight: bold");
        }
        if self.italics {
            out.push("font-style: italic");
        }
        if self.underline {
            out.push("text-decoration: underline");
        }
        out
    }
}

/// Opening and closing markup for a block of the given kind.
pub fn block_tags(kind: Option<BlockKind>) -> (&'static str, &'static str) {
    match kind {
        None | Some(BlockKind::Paragraph) => ("<p>", "</p>"),
        Some(BlockKind::Code) => ("<pre><code>", "</code></pre>"),
    }
}

pub fn align_wrapper(align: Align) -> (String, &'static str) {
    (
        format!("<div style=\"text-align: {}\">", align.as_str()),
        "</div>",
    )
}

pub fn render_leaf(text: &TextNode) -> String {
    let style = LeafStyle::of(text);
    let body = escape_html(&text.text);
    if style.is_default() {
        return format!("<span>{body}</span>");
    }
    format!(
        "<span style=\"{}\">{body}</span>",
        style.directives().join("; ")
    )
}

pub fn render_block(block: &BlockNode) -> String {
    let (open, close) = block_tags(block.kind);
    let mut inner = String::new();
    for child in &block.children {
        render_node_into(child, &mut inner);
    }

    match block.align {
        Some(align) => {
            let (wrap_open, wrap_close) = align_wrapper(align);
            format!("{wrap_open}{open}{inner}{close}{wrap_close}")
        }
        None => format!("{open}{inner}{close}"),
    }
}

/// One top-level block per line.
pub fn render_document(doc: &Document) -> String {
    let mut out = String::new();
    for (ix, node) in doc.children.iter().enumerate() {
        if ix > 0 {
            out.push('\n');
        }
        render_node_into(node, &mut out);
    }
    out
}

fn render_node_into(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(&render_leaf(t)),
        Node::Block(b) => out.push_str(&render_block(b)),
    }
}

fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
