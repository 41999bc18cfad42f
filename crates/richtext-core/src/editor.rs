use log::debug;
use thiserror::Error;

use crate::document::{Document, Node, Path, Point, Selection, TextNode, clamp_to_char_boundary};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("point {path:?} does not name a text leaf")]
    InvalidPoint { path: Path },
}

/// The editing session's state: it exclusively owns the tree and the
/// selection. Formatting operations borrow it mutably for one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Editor {
    doc: Document,
    selection: Option<Selection>,
}

impl Editor {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            selection: None,
        }
    }

    pub fn with_selection(doc: Document, selection: Selection) -> Result<Self, SelectionError> {
        let mut editor = Self::new(doc);
        editor.set_selection(selection)?;
        Ok(editor)
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn into_doc(self) -> Document {
        self.doc
    }

    /// Both points must name text leaves; offsets are clamped to the leaf.
    pub fn set_selection(&mut self, selection: Selection) -> Result<(), SelectionError> {
        let anchor = self.resolve(&selection.anchor)?;
        let focus = self.resolve(&selection.focus)?;
        self.selection = Some(Selection { anchor, focus });
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Selects from the first leaf to the end of the last. No-op on a
    /// document without leaves.
    pub fn select_all(&mut self) {
        if let (Some(start), Some(end)) = (self.doc.first_point(), self.doc.last_point()) {
            self.selection = Some(Selection::new(start, end));
        }
    }

    /// Replaces the selected text with `text` and leaves a caret after it.
    /// Expanded selections lose their text but keep their block structure.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let Some(selection) = self.selection.clone() else {
            debug!("insert_text without a selection");
            return false;
        };

        let (start, end) = selection.ordered();
        let mut changed = false;
        if !selection.is_collapsed() {
            changed |= self.delete_range(&start, &end);
        }

        let Some(leaf) = self.doc.text_mut(&start.path) else {
            return changed;
        };
        if text.is_empty() {
            self.selection = Some(Selection::collapsed(start));
            return changed;
        }
        let offset = clamp_to_char_boundary(&leaf.text, start.offset);
        leaf.text.insert_str(offset, text);
        self.selection = Some(Selection::collapsed(Point::new(
            start.path,
            offset + text.len(),
        )));
        true
    }

    fn delete_range(&mut self, start: &Point, end: &Point) -> bool {
        let paths: Vec<Path> = self
            .doc
            .leaves()
            .into_iter()
            .map(|(path, _)| path)
            .filter(|path| *path >= start.path && *path <= end.path)
            .collect();

        let mut changed = false;
        for path in paths {
            let Some(leaf) = self.doc.text_mut(&path) else {
                continue;
            };
            let from = if path == start.path {
                clamp_to_char_boundary(&leaf.text, start.offset)
            } else {
                0
            };
            let to = if path == end.path {
                clamp_to_char_boundary(&leaf.text, end.offset)
            } else {
                leaf.text.len()
            };
            if from < to {
                leaf.text.replace_range(from..to, "");
                changed = true;
            }
        }
        changed
    }

    /// Merges adjacent leaves with identical marks and drops empty leaves
    /// that have a sibling leaf. The selection keeps its text offsets.
    pub fn normalize_text_runs(&mut self) -> bool {
        let anchor = self
            .selection
            .as_ref()
            .and_then(|s| block_offset(&self.doc, &s.anchor));
        let focus = self
            .selection
            .as_ref()
            .and_then(|s| block_offset(&self.doc, &s.focus));

        let changed = merge_runs(&mut self.doc.children);
        if !changed {
            return false;
        }

        if let (Some((anchor_block, anchor_offset)), Some((focus_block, focus_offset))) =
            (anchor, focus)
        {
            let anchor = point_at_block_offset(&self.doc, &anchor_block, anchor_offset);
            let focus = point_at_block_offset(&self.doc, &focus_block, focus_offset);
            self.selection = match (anchor, focus) {
                (Some(anchor), Some(focus)) => Some(Selection { anchor, focus }),
                _ => None,
            };
        }
        true
    }

    pub(crate) fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub(crate) fn replace_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    fn resolve(&self, point: &Point) -> Result<Point, SelectionError> {
        self.doc
            .clamp_point(point)
            .ok_or_else(|| SelectionError::InvalidPoint {
                path: point.path.clone(),
            })
    }
}

fn merge_runs(nodes: &mut Vec<Node>) -> bool {
    let mut changed = false;
    for node in nodes.iter_mut() {
        if let Node::Block(block) = node {
            changed |= merge_runs(&mut block.children);
        }
    }

    let leaf_count = nodes.iter().filter(|n| n.as_text().is_some()).count();
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    let mut dropped_empty = 0usize;
    for node in nodes.drain(..) {
        if let Node::Text(t) = &node {
            if t.text.is_empty() && leaf_count - dropped_empty > 1 {
                dropped_empty += 1;
                changed = true;
                continue;
            }
        }
        if let (Some(Node::Text(prev)), Node::Text(next)) = (out.last_mut(), &node) {
            if prev.same_marks(next) {
                prev.text.push_str(&next.text);
                changed = true;
                continue;
            }
        }
        out.push(node);
    }
    *nodes = out;
    changed
}

/// `(lowest block path, byte offset across that block's leaves)`.
fn block_offset(doc: &Document, point: &Point) -> Option<(Path, usize)> {
    let (&child_ix, block_path) = point.path.split_last()?;
    let children = if block_path.is_empty() {
        &doc.children
    } else {
        &doc.block(block_path)?.children
    };
    let before: usize = children
        .iter()
        .take(child_ix)
        .filter_map(Node::as_text)
        .map(|t| t.text.len())
        .sum();
    Some((block_path.to_vec(), before + point.offset))
}

fn point_at_block_offset(doc: &Document, block_path: &[usize], offset: usize) -> Option<Point> {
    let children = if block_path.is_empty() {
        &doc.children
    } else {
        &doc.block(block_path)?.children
    };

    let mut remaining = offset;
    let mut last: Option<(usize, &TextNode)> = None;
    for (ix, node) in children.iter().enumerate() {
        let Node::Text(t) = node else { continue };
        if remaining <= t.text.len() {
            let mut path = block_path.to_vec();
            path.push(ix);
            return Some(Point::new(path, clamp_to_char_boundary(&t.text, remaining)));
        }
        remaining -= t.text.len();
        last = Some((ix, t));
    }

    // Past the end: clamp to the last leaf.
    let (ix, t) = last?;
    let mut path = block_path.to_vec();
    path.push(ix);
    Some(Point::new(path, t.text.len()))
}
