//! Free-text filtering of thread posts.
//!
//! Each post is matched against a lowercase "searchable string" built from its
//! display metadata and text. The format is part of the observable contract:
//! a filter matches exactly when it is a substring of that string.

use crate::model::Post;

/// Builds the lowercase searchable string for a post at `depth`.
///
/// Depth 0 is the question; everything deeper is a reply. The reply count is
/// the post's full reply count, independent of any filter.
pub fn searchable_text(post: &Post, depth: usize) -> String {
    let meta = if depth == 0 {
        format!(
            "Question • {} • {} • {} • {} Replies [{}]",
            post.author,
            post.timestamp,
            post.id,
            post.reply_count(),
            post.tag.as_deref().unwrap_or_default()
        )
    } else {
        format!(
            "{} replied • {} • {} • {} Replies",
            post.author,
            post.timestamp,
            post.id,
            post.reply_count()
        )
    };
    format!("{meta} {}", post.text).to_lowercase()
}

/// Normalizes raw filter input: trimmed, lowercased, `None` when blank.
pub fn normalize_filter(filter: Option<&str>) -> Option<String> {
    let trimmed = filter?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Returns true if the post matches an already-normalized filter.
pub fn matches(post: &Post, depth: usize, normalized_filter: &str) -> bool {
    normalized_filter.is_empty() || searchable_text(post, depth).contains(normalized_filter)
}
