//! Two-column terminal rendering of laid-out threads.
//!
//! Each row becomes one or more lines: the left card, a 3-column gutter
//! holding the arrow of a paired row, and the right card.

pub mod json;
pub mod text;

use std::fmt::Write as _;
use std::iter;

use tark_core::layout::{Row, ThreadLayout, ThreadNode};
use tark_core::model::{Board, EvidenceUrl};
use unicode_width::UnicodeWidthStr;

use self::text::{pad_to_width, sanitize_for_display, truncate_with_ellipsis, wrap_text};

const GUTTER_WIDTH: usize = 3;
const RULE_CHAR: char = '─';
const EVIDENCE_MARK: char = '↗';

/// Renders every non-hidden thread of `layouts`.
///
/// Returns an empty string when all threads are hidden.
pub fn render_board(board: &Board, layouts: &[ThreadLayout<'_>], column_width: usize) -> String {
    let mut out = String::new();
    let rule: String = iter::repeat_n(RULE_CHAR, column_width * 2 + GUTTER_WIDTH).collect();

    for layout in layouts {
        let body = match layout {
            ThreadLayout::Hidden { .. } => continue,
            ThreadLayout::Visible { rows, .. } => render_thread(board, rows, column_width),
            ThreadLayout::Failed { question, error } => {
                format!("[skipped thread {}: {error}]\n", question.id.short())
            }
        };
        if !out.is_empty() {
            out.push_str(&rule);
            out.push('\n');
        }
        out.push_str(&body);
    }

    out
}

fn render_thread(board: &Board, rows: &[Row<'_>], column_width: usize) -> String {
    let mut out = String::new();
    let header = format!(
        "{}{}{}",
        pad_to_width(&board.left_label, column_width),
        " ".repeat(GUTTER_WIDTH),
        truncate_with_ellipsis(&board.right_label, column_width),
    );
    out.push_str(header.trim_end());
    out.push('\n');

    for row in rows {
        out.push('\n');
        render_row(&mut out, row, column_width);
    }
    out
}

fn render_row(out: &mut String, row: &Row<'_>, column_width: usize) {
    let cells = row.cells();
    let left = cells
        .left
        .map(|node| card_lines(node, column_width))
        .unwrap_or_default();
    let right = cells
        .right
        .map(|node| card_lines(node, column_width))
        .unwrap_or_default();
    let height = left.len().max(right.len());

    for i in 0..height {
        let gutter = match row.arrow() {
            Some(arrow) if i == 0 => format!(" {} ", arrow.glyph()),
            _ => " ".repeat(GUTTER_WIDTH),
        };
        let l = left.get(i).map_or("", String::as_str);
        let r = right.get(i).map_or("", String::as_str);
        let line = format!("{}{gutter}{r}", pad_to_width(l, column_width));
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

/// Lines of one post card: meta line, votes line, wrapped text, then one
/// line per evidence link.
fn card_lines(node: ThreadNode<'_>, width: usize) -> Vec<String> {
    let mut lines = vec![
        truncate_with_ellipsis(&sanitize_for_display(&card_meta(node)), width),
        truncate_with_ellipsis(&card_votes(node), width),
    ];
    lines.extend(wrap_text(&sanitize_for_display(&node.post.text), width));
    lines.extend(node.post.evidence.iter().map(|link| {
        truncate_with_ellipsis(&sanitize_for_display(&evidence_line(link)), width)
    }));
    debug_assert!(lines.iter().all(|l| l.width() <= width));
    lines
}

fn card_meta(node: ThreadNode<'_>) -> String {
    let post = node.post;
    let mut meta = if node.is_question() {
        format!("Question • {}", post.author)
    } else {
        format!("{} replied", post.author)
    };
    let _ = write!(
        meta,
        " • {} • {} • {} Replies",
        post.timestamp,
        post.id.short(),
        post.reply_count()
    );
    if node.is_question()
        && let Some(tag) = &post.tag
    {
        let _ = write!(meta, " [{tag}]");
    }
    meta
}

fn evidence_line(link: &EvidenceUrl) -> String {
    match &link.title {
        Some(title) => format!("{EVIDENCE_MARK} {title} <{}>", link.url),
        None => format!("{EVIDENCE_MARK} {}", link.url),
    }
}

fn card_votes(node: ThreadNode<'_>) -> String {
    let votes = node.post.votes;
    format!("▲ {}  ▼ {}", votes.up, votes.down)
}
