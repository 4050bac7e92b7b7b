//! Depth-first flattening of a question tree.

use std::collections::HashMap;

use super::{LayoutError, MAX_THREAD_DEPTH, MalformedReason, ThreadNode};
use crate::model::{Post, PostId};

#[derive(Debug, Clone, Copy)]
pub(super) struct FlatEntry<'a> {
    pub node: ThreadNode<'a>,
    /// Index of the parent entry; `None` for the question.
    pub parent: Option<usize>,
}

/// Pre-order walk from `question` at depth 0, replies in insertion order.
///
/// Uses an explicit stack, so deep threads cannot overflow the call stack
/// here. Fails on repeated ids and on depth beyond [`MAX_THREAD_DEPTH`].
pub(super) fn flatten(question: &Post) -> Result<Vec<FlatEntry<'_>>, LayoutError> {
    let mut entries: Vec<FlatEntry<'_>> = Vec::new();
    let mut first_seen: HashMap<&PostId, usize> = HashMap::new();
    let mut stack: Vec<(&Post, usize, Option<usize>)> = vec![(question, 0, None)];

    while let Some((post, depth, parent)) = stack.pop() {
        if depth > MAX_THREAD_DEPTH {
            return Err(LayoutError::Malformed {
                post_id: post.id.clone(),
                reason: MalformedReason::TooDeep,
            });
        }

        if let Some(&earlier) = first_seen.get(&post.id) {
            let reason = if is_ancestor(&entries, parent, earlier) {
                MalformedReason::Cycle
            } else {
                MalformedReason::DuplicateId
            };
            return Err(LayoutError::Malformed {
                post_id: post.id.clone(),
                reason,
            });
        }

        let idx = entries.len();
        first_seen.insert(&post.id, idx);
        entries.push(FlatEntry {
            node: ThreadNode { post, depth },
            parent,
        });

        // Reverse so the first reply is popped first.
        for reply in post.replies.iter().rev() {
            stack.push((reply, depth + 1, Some(idx)));
        }
    }

    Ok(entries)
}

/// Walks the parent chain starting at `from` looking for `target`.
fn is_ancestor(entries: &[FlatEntry<'_>], from: Option<usize>, target: usize) -> bool {
    let mut cursor = from;
    while let Some(idx) = cursor {
        if idx == target {
            return true;
        }
        cursor = entries[idx].parent;
    }
    false
}
