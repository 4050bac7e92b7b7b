//! Read-only handlers: show and list.

use anyhow::{Context, Result, bail};
use tark_core::layout::{self, ThreadLayout};
use tark_core::model::PostId;

use super::Session;
use crate::render::{self, json, text};

pub struct ShowOptions<'a> {
    pub filter: Option<&'a str>,
    pub question: Option<&'a str>,
    pub json: bool,
    pub width: Option<usize>,
}

pub fn show(session: &Session, opts: &ShowOptions<'_>) -> Result<()> {
    let board = session.load_board()?;

    let mut layouts = layout::layout_board(&board, opts.filter);
    if let Some(id) = opts.question {
        let id = PostId::new(id.trim());
        let Some(question) = board.find_question_of(&id) else {
            bail!("No post with id '{id}' in topic '{}'", board.topic);
        };
        layouts.retain(|l| l.question().id == question.id);
    }

    if opts.json {
        let exported = json::export_threads(&layouts);
        let out = serde_json::to_string_pretty(&exported).context("serialize rows")?;
        println!("{out}");
        return Ok(());
    }

    if board.questions.is_empty() {
        println!("No questions yet in '{}'.", board.topic);
        return Ok(());
    }
    if layouts.iter().all(|l| matches!(l, ThreadLayout::Hidden { .. })) {
        println!("No posts match '{}'.", opts.filter.unwrap_or_default().trim());
        return Ok(());
    }

    let width = session.config.effective_column_width(opts.width);
    print!("{}", render::render_board(&board, &layouts, width));
    Ok(())
}

pub fn list(session: &Session) -> Result<()> {
    let board = session.load_board()?;
    if board.questions.is_empty() {
        println!("No questions yet in '{}'.", board.topic);
        return Ok(());
    }
    for q in &board.questions {
        println!(
            "{}  {:<5}  {:>3} replies  ▲ {} ▼ {}  {}",
            q.id,
            q.side.as_str(),
            q.reply_count(),
            q.votes.up,
            q.votes.down,
            text::truncate_with_ellipsis(&text::sanitize_for_display(&q.text), 60)
        );
    }
    Ok(())
}
