//! Selection-scoped formatting: "is this attribute active" queries and the
//! mutations that follow from them.
//!
//! Inline marks use a universal match: a mark is active only when every text
//! leaf in the selection carries it, so toggling a mixed selection always
//! sets the mark. Code-block detection is existential: any selected block
//! (or block ancestor) of type `code` makes it active.

use std::ops::Range;

use log::debug;

use crate::document::{
    Align, BlockKind, Document, Mark, Path, Point, Selection, next_sibling, shift_for_insert,
};
use crate::editor::Editor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Mark(Mark),
    CodeBlock,
}

/// A text leaf touched by a selection and the byte range of it that is
/// selected. Collapsed selections yield the caret leaf with an empty range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSpan {
    pub path: Path,
    pub range: Range<usize>,
}

/// Text leaves intersecting `selection`, in document order.
pub fn selected_leaves(doc: &Document, selection: &Selection) -> Vec<LeafSpan> {
    if selection.is_collapsed() {
        let caret = &selection.focus;
        return doc
            .clamp_point(caret)
            .map(|p| LeafSpan {
                path: p.path,
                range: p.offset..p.offset,
            })
            .into_iter()
            .collect();
    }

    let (start, end) = selection.ordered();
    doc.leaves()
        .into_iter()
        .filter(|(path, _)| *path >= start.path && *path <= end.path)
        .filter_map(|(path, leaf)| {
            let is_start = path == start.path;
            let is_end = path == end.path;
            let from = if is_start {
                start.offset.min(leaf.text.len())
            } else {
                0
            };
            let to = if is_end {
                end.offset.min(leaf.text.len())
            } else {
                leaf.text.len()
            };
            // Boundary leaves only count when part of their text is covered.
            if (is_start || is_end) && from >= to {
                return None;
            }
            Some(LeafSpan {
                path,
                range: from..to,
            })
        })
        .collect()
}

/// Lowest blocks (blocks holding text leaves) from the selection start to its
/// end, in document order.
pub fn selected_blocks(doc: &Document, selection: &Selection) -> Vec<Path> {
    let (start, end) = selection.ordered();
    let mut out: Vec<Path> = Vec::new();
    for (path, _) in doc.leaves() {
        if path < start.path || path > end.path {
            continue;
        }
        let Some((_, parent)) = path.split_last() else {
            continue;
        };
        if parent.is_empty() || out.iter().any(|p| p.as_slice() == parent) {
            continue;
        }
        out.push(parent.to_vec());
    }
    out
}

/// Universal match over the selection. `false` without a selection or when
/// nothing intersects it.
pub fn is_active(editor: &Editor, format: Format) -> bool {
    let Some(selection) = editor.selection() else {
        return false;
    };
    let doc = editor.doc();
    match format {
        Format::Mark(mark) => {
            let spans = selected_leaves(doc, selection);
            !spans.is_empty()
                && spans
                    .iter()
                    .all(|span| doc.text(&span.path).is_some_and(|t| t.has_mark(mark)))
        }
        Format::CodeBlock => {
            let blocks = selected_blocks(doc, selection);
            !blocks.is_empty()
                && blocks
                    .iter()
                    .all(|path| doc.block(path).is_some_and(|b| b.is_code()))
        }
    }
}

pub fn is_mark_active(editor: &Editor, mark: Mark) -> bool {
    is_active(editor, Format::Mark(mark))
}

/// Existential match: any selected block, or any block above one, is `code`.
pub fn is_code_block_active(editor: &Editor) -> bool {
    let Some(selection) = editor.selection() else {
        return false;
    };
    let doc = editor.doc();
    selected_blocks(doc, selection).iter().any(|path| {
        (1..=path.len()).any(|depth| doc.block(&path[..depth]).is_some_and(|b| b.is_code()))
    })
}

/// Sets `mark` on the selected text, or clears it when the whole selection
/// already carries it. Leaves are split at the selection edges so only the
/// selected text changes; the selection is remapped onto the split leaves.
///
/// Returns whether the document changed. Collapsed or absent selections are
/// a no-op.
pub fn toggle_mark(editor: &mut Editor, mark: Mark) -> bool {
    let Some(selection) = editor.selection().cloned() else {
        debug!("toggle {}: no selection", mark.as_str());
        return false;
    };
    if selection.is_collapsed() {
        debug!("toggle {}: collapsed selection", mark.as_str());
        return false;
    }

    let value = if is_mark_active(editor, mark) {
        None
    } else {
        Some(true)
    };

    let (start, end) = selection.ordered();
    let (start, end, split) = split_at_edges(editor.doc_mut(), start, end);
    let range = Selection::new(start, end);

    let doc = editor.doc_mut();
    let mut changed = split;
    for span in selected_leaves(doc, &range) {
        let Some(leaf) = doc.text_mut(&span.path) else {
            continue;
        };
        if leaf.mark(mark) != value {
            leaf.set_mark(mark, value);
            changed = true;
        }
    }

    debug!(
        "toggle {} -> {:?} (changed: {changed})",
        mark.as_str(),
        value
    );
    editor.replace_selection(if selection.is_backward() {
        range.reversed()
    } else {
        range
    });
    changed
}

/// Splits the leaves under `start` and `end` so that the range covers whole
/// leaves. Returns the remapped points and whether anything was split.
fn split_at_edges(doc: &mut Document, start: Point, mut end: Point) -> (Point, Point, bool) {
    // End first: splitting there never moves `start`.
    let mut split = doc.split_text(&end.path, end.offset);

    if !doc.split_text(&start.path, start.offset) {
        return (start, end, split);
    }
    split = true;

    let inserted = next_sibling(&start.path);
    if end.path == start.path {
        end = Point::new(inserted.clone(), end.offset.saturating_sub(start.offset));
    } else {
        shift_for_insert(&mut end.path, &inserted);
    }
    (Point::new(inserted, 0), end, split)
}

/// Turns the selected blocks into code blocks, or, when any selected block
/// already is one, reverts the code blocks among them to the default type.
/// Blocks that are not code are left alone when reverting.
pub fn toggle_code_block(editor: &mut Editor) -> bool {
    let Some(selection) = editor.selection().cloned() else {
        debug!("toggle code block: no selection");
        return false;
    };

    let active = is_code_block_active(editor);
    let doc = editor.doc_mut();
    let mut changed = false;
    for path in selected_blocks(doc, &selection) {
        let Some(block) = doc.block_mut(&path) else {
            continue;
        };
        let next = match (active, block.kind) {
            (true, Some(BlockKind::Code)) => None,
            (true, kind) => kind,
            (false, _) => Some(BlockKind::Code),
        };
        if block.kind != next {
            block.kind = next;
            changed = true;
        }
    }

    debug!("toggle code block (was active: {active}, changed: {changed})");
    changed
}

/// Sets `align` on every selected block. Idempotent.
pub fn set_alignment(editor: &mut Editor, align: Align) -> bool {
    let Some(selection) = editor.selection().cloned() else {
        debug!("set alignment {}: no selection", align.as_str());
        return false;
    };

    let doc = editor.doc_mut();
    let mut changed = false;
    for path in selected_blocks(doc, &selection) {
        if let Some(block) = doc.block_mut(&path) {
            if block.align != Some(align) {
                block.align = Some(align);
                changed = true;
            }
        }
    }

    debug!("set alignment {} (changed: {changed})", align.as_str());
    changed
}
