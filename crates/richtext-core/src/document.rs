use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub type Path = Vec<usize>;

/// The whole editable tree. Serializes as a bare JSON array of blocks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(TextNode),
    Block(BlockNode),
}

impl Node {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Block(BlockNode {
            kind: Some(BlockKind::Paragraph),
            align: None,
            children: vec![Node::text(text)],
        })
    }

    pub fn code_block(text: impl Into<String>) -> Self {
        Node::Block(BlockNode {
            kind: Some(BlockKind::Code),
            align: None,
            children: vec![Node::text(text)],
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode::new(text))
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(t) => Some(t),
            Node::Block(_) => None,
        }
    }

    pub fn as_block(&self) -> Option<&BlockNode> {
        match self {
            Node::Block(b) => Some(b),
            Node::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Code,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Code => "code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub const ALL: [Align; 3] = [Align::Left, Align::Center, Align::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    /// `None` renders as the default block.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl BlockNode {
    pub fn is_code(&self) -> bool {
        self.kind == Some(BlockKind::Code)
    }

    pub fn has_text_children(&self) -> bool {
        self.children.iter().any(|n| matches!(n, Node::Text(_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Bold,
    Italics,
    Underline,
}

impl Mark {
    pub const ALL: [Mark; 3] = [Mark::Bold, Mark::Italics, Mark::Underline];

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italics => "italics",
            Mark::Underline => "underline",
        }
    }
}

/// A leaf. Each mark is absent, explicitly `false`, or `true`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_mark(mut self, mark: Mark, value: bool) -> Self {
        self.set_mark(mark, Some(value));
        self
    }

    pub fn mark(&self, mark: Mark) -> Option<bool> {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italics => self.italics,
            Mark::Underline => self.underline,
        }
    }

    pub fn set_mark(&mut self, mark: Mark, value: Option<bool>) {
        let slot = match mark {
            Mark::Bold => &mut self.bold,
            Mark::Italics => &mut self.italics,
            Mark::Underline => &mut self.underline,
        };
        *slot = value;
    }

    pub fn has_mark(&self, mark: Mark) -> bool {
        self.mark(mark) == Some(true)
    }

    pub fn same_marks(&self, other: &TextNode) -> bool {
        Mark::ALL.iter().all(|&m| self.mark(m) == other.mark(m))
    }

    fn split_off(&mut self, offset: usize) -> TextNode {
        let tail = self.text.split_off(offset);
        TextNode {
            text: tail,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then(self.offset.cmp(&other.offset))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    /// `(start, end)` in document order.
    pub fn ordered(&self) -> (Point, Point) {
        if self.is_backward() {
            (self.focus.clone(), self.anchor.clone())
        } else {
            (self.anchor.clone(), self.focus.clone())
        }
    }

    pub fn reversed(self) -> Self {
        Self {
            anchor: self.focus,
            focus: self.anchor,
        }
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// The single-paragraph document used when nothing was saved.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            children: vec![Node::paragraph(text)],
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get(*first)?;
        for &ix in rest {
            node = match node {
                Node::Block(b) => b.children.get(ix)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for &ix in rest {
            node = match node {
                Node::Block(b) => b.children.get_mut(ix)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub fn text(&self, path: &[usize]) -> Option<&TextNode> {
        match self.node(path)? {
            Node::Text(t) => Some(t),
            Node::Block(_) => None,
        }
    }

    pub fn text_mut(&mut self, path: &[usize]) -> Option<&mut TextNode> {
        match self.node_mut(path)? {
            Node::Text(t) => Some(t),
            Node::Block(_) => None,
        }
    }

    pub fn block(&self, path: &[usize]) -> Option<&BlockNode> {
        match self.node(path)? {
            Node::Block(b) => Some(b),
            Node::Text(_) => None,
        }
    }

    pub fn block_mut(&mut self, path: &[usize]) -> Option<&mut BlockNode> {
        match self.node_mut(path)? {
            Node::Block(b) => Some(b),
            Node::Text(_) => None,
        }
    }

    /// The children of the node at `parent`; the root's children for `[]`.
    pub fn children_mut(&mut self, parent: &[usize]) -> Option<&mut Vec<Node>> {
        if parent.is_empty() {
            return Some(&mut self.children);
        }
        self.block_mut(parent).map(|b| &mut b.children)
    }

    /// Every text leaf with its path, in document order.
    pub fn leaves(&self) -> Vec<(Path, &TextNode)> {
        fn walk<'a>(nodes: &'a [Node], path: &mut Path, out: &mut Vec<(Path, &'a TextNode)>) {
            for (ix, node) in nodes.iter().enumerate() {
                path.push(ix);
                match node {
                    Node::Text(t) => out.push((path.clone(), t)),
                    Node::Block(b) => walk(&b.children, path, out),
                }
                path.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.children, &mut Vec::new(), &mut out);
        out
    }

    pub fn first_point(&self) -> Option<Point> {
        self.leaves()
            .into_iter()
            .next()
            .map(|(path, _)| Point::new(path, 0))
    }

    pub fn last_point(&self) -> Option<Point> {
        self.leaves()
            .into_iter()
            .last()
            .map(|(path, t)| Point::new(path, t.text.len()))
    }

    /// The point clamped to the leaf it names, or `None` if the path does not
    /// resolve to a text leaf.
    pub fn clamp_point(&self, point: &Point) -> Option<Point> {
        let text = self.text(&point.path)?;
        Some(Point::new(
            point.path.clone(),
            clamp_to_char_boundary(&text.text, point.offset),
        ))
    }

    /// Splits the leaf at `path` so that `[offset..]` becomes its next
    /// sibling. Returns `false` when the offset is at an edge and nothing was
    /// split.
    pub fn split_text(&mut self, path: &[usize], offset: usize) -> bool {
        let Some((&index, parent)) = path.split_last() else {
            return false;
        };
        let Some(children) = self.children_mut(parent) else {
            return false;
        };
        let Some(Node::Text(text)) = children.get_mut(index) else {
            return false;
        };
        let offset = clamp_to_char_boundary(&text.text, offset);
        if offset == 0 || offset >= text.text.len() {
            return false;
        }
        let tail = text.split_off(offset);
        children.insert(index + 1, Node::Text(tail));
        true
    }
}

pub(crate) fn clamp_to_char_boundary(s: &str, mut ix: usize) -> usize {
    ix = ix.min(s.len());
    while ix > 0 && !s.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}

/// The path of the sibling directly after `path`.
pub(crate) fn next_sibling(path: &[usize]) -> Path {
    let mut next = path.to_vec();
    if let Some(last) = next.last_mut() {
        *last += 1;
    }
    next
}

/// Adjusts `path` for a node inserted at `inserted`.
pub(crate) fn shift_for_insert(path: &mut Path, inserted: &[usize]) {
    let Some((&index, parent)) = inserted.split_last() else {
        return;
    };
    let depth = parent.len();
    if path.len() <= depth || !path.starts_with(parent) {
        return;
    }
    if path[depth] >= index {
        path[depth] += 1;
    }
}
