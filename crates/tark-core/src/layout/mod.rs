//! Thread layout engine.
//!
//! Turns one question tree into the ordered rows of a two-column view.
//!
//! ## Pairing
//!
//! A post shown for the first time is paired with its first visible reply;
//! its other replies get rows of their own. A reply that was already shown as
//! the child half of a row is drawn again as the parent half of a new row for
//! each of its own replies, so every visible parent/child edge lands in
//! exactly one paired row:
//!
//! ```text
//! Q (left)    → A1 (right)
//! A1.1 (left) ← A1 (right)
//!               A2 (right)
//! ```
//!
//! Layout is pure: rows borrow the input tree and nothing is mutated. It is
//! also atomic: either the full row list or an error is returned.

mod flatten;
mod row;

use std::collections::HashSet;
use std::fmt;

pub use row::{Arrow, Row, RowCells, ThreadNode};

use self::flatten::{FlatEntry, flatten};
use crate::model::{Board, Post, PostId};
use crate::search;

/// Deepest nesting level accepted before a thread is treated as malformed.
pub const MAX_THREAD_DEPTH: usize = 256;

/// Why a thread could not be flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// A reply repeats the id of one of its ancestors.
    Cycle,
    /// Two unrelated posts share an id.
    DuplicateId,
    /// Nesting exceeds [`MAX_THREAD_DEPTH`].
    TooDeep,
}

impl MalformedReason {
    fn describe(self) -> &'static str {
        match self {
            MalformedReason::Cycle => "reply repeats an ancestor's id",
            MalformedReason::DuplicateId => "duplicate post id",
            MalformedReason::TooDeep => "thread nesting too deep",
        }
    }
}

/// Layout failure. No rows are produced when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    Malformed {
        post_id: PostId,
        reason: MalformedReason,
    },
    /// The flattened root was not at depth 0.
    InvalidRoot { depth: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Malformed { post_id, reason } => {
                write!(f, "malformed thread at {post_id}: {}", reason.describe())
            }
            LayoutError::InvalidRoot { depth } => {
                write!(f, "thread root flattened at depth {depth}, expected 0")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Lays out a question tree as two-column rows.
///
/// `filter` is matched case-insensitively against each post's searchable
/// text (see [`search::searchable_text`]); `None` or blank keeps every post.
/// An empty result means the whole thread is hidden: nothing matched, or the
/// question itself did not match.
///
/// # Errors
/// Returns [`LayoutError::Malformed`] when a post id repeats or nesting
/// exceeds [`MAX_THREAD_DEPTH`].
pub fn layout_thread<'a>(
    question: &'a Post,
    filter: Option<&str>,
) -> Result<Vec<Row<'a>>, LayoutError> {
    let entries = flatten(question)?;

    match entries.first() {
        Some(root) if root.node.depth == 0 => {}
        Some(root) => {
            return Err(LayoutError::InvalidRoot {
                depth: root.node.depth,
            });
        }
        None => return Ok(Vec::new()),
    }

    let visible: Vec<bool> = match search::normalize_filter(filter) {
        Some(needle) => entries
            .iter()
            .map(|e| search::matches(e.node.post, e.node.depth, &needle))
            .collect(),
        None => vec![true; entries.len()],
    };

    if !visible[0] {
        tracing::debug!(question = %question.id, "thread hidden by filter");
        return Ok(Vec::new());
    }

    let children = visible_children(&entries, &visible);
    let mut emitter = RowEmitter {
        entries: &entries,
        children: &children,
        shown_as_child: HashSet::new(),
        rows: Vec::new(),
    };
    emitter.process(0, true);

    tracing::debug!(
        question = %question.id,
        posts = entries.len(),
        rows = emitter.rows.len(),
        "thread laid out"
    );
    Ok(emitter.rows)
}

/// For each visible entry, its visible direct replies in order.
///
/// Replies whose parent was filtered out are unreachable and never emitted.
fn visible_children(entries: &[FlatEntry<'_>], visible: &[bool]) -> Vec<Vec<usize>> {
    let mut children = vec![Vec::new(); entries.len()];
    for (idx, entry) in entries.iter().enumerate() {
        if !visible[idx] {
            continue;
        }
        if let Some(parent) = entry.parent
            && visible[parent]
        {
            children[parent].push(idx);
        }
    }
    children
}

struct RowEmitter<'t, 'a> {
    entries: &'t [FlatEntry<'a>],
    children: &'t [Vec<usize>],
    /// Entries already emitted as the child half of a paired row.
    shown_as_child: HashSet<usize>,
    rows: Vec<Row<'a>>,
}

impl<'t> RowEmitter<'t, '_> {
    // Recursion depth is bounded by MAX_THREAD_DEPTH, enforced in flatten.
    fn process(&mut self, idx: usize, first_occurrence: bool) {
        let node = self.entries[idx].node;
        let all_children: &'t [Vec<usize>] = self.children;
        let children = &all_children[idx];

        if children.is_empty() {
            if first_occurrence && !self.shown_as_child.contains(&idx) {
                self.rows.push(Row::Single { node });
            }
            return;
        }

        for (i, &child_idx) in children.iter().enumerate() {
            let child = self.entries[child_idx].node;
            if i == 0 || !first_occurrence {
                self.rows.push(Row::Paired {
                    parent: node,
                    child,
                });
                self.shown_as_child.insert(child_idx);
            } else if self.shown_as_child.insert(child_idx) {
                self.rows.push(Row::Single { node: child });
            }
            self.process(child_idx, false);
        }
    }
}

/// Layout outcome for one question of a board.
#[derive(Debug)]
pub enum ThreadLayout<'a> {
    Visible {
        question: &'a Post,
        rows: Vec<Row<'a>>,
    },
    /// Filtered to nothing; render nothing, not even a separator.
    Hidden { question: &'a Post },
    /// The thread is malformed; other threads are unaffected.
    Failed {
        question: &'a Post,
        error: LayoutError,
    },
}

impl<'a> ThreadLayout<'a> {
    pub fn question(&self) -> &'a Post {
        match self {
            ThreadLayout::Visible { question, .. }
            | ThreadLayout::Hidden { question }
            | ThreadLayout::Failed { question, .. } => *question,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, ThreadLayout::Visible { .. })
    }
}

/// Lays out every question of a board independently.
pub fn layout_board<'a>(board: &'a Board, filter: Option<&str>) -> Vec<ThreadLayout<'a>> {
    board
        .questions
        .iter()
        .map(|question| match layout_thread(question, filter) {
            Ok(rows) if rows.is_empty() => ThreadLayout::Hidden { question },
            Ok(rows) => ThreadLayout::Visible { question, rows },
            Err(error) => {
                tracing::warn!(question = %question.id, %error, "skipping malformed thread");
                ThreadLayout::Failed { question, error }
            }
        })
        .collect()
}
