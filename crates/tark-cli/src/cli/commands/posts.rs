//! Handlers that append to a board: ask, reply, vote.
//!
//! Each prints the affected post id on stdout so scripts can chain calls.

use anyhow::{Context, Result, bail};
use tark_core::board::{NewQuestion, NewReply};
use tark_core::model::{EvidenceUrl, PostId, Side, VoteKind};

use super::Session;

pub struct AskOptions<'a> {
    pub text: &'a str,
    pub side: Option<Side>,
    pub tag: Option<&'a str>,
    pub author: Option<&'a str>,
    pub evidence: Vec<EvidenceUrl>,
}

pub struct ReplyOptions<'a> {
    pub parent: &'a str,
    pub text: &'a str,
    pub author: Option<&'a str>,
    pub evidence: Vec<EvidenceUrl>,
}

/// Pairs `--url` values with `--url-title` values by position.
///
/// Titles are optional, so there may be fewer titles than urls but not more.
pub fn evidence_links(urls: &[String], titles: &[String]) -> Result<Vec<EvidenceUrl>> {
    if titles.len() > urls.len() {
        bail!(
            "{} --url-title value(s) given for {} --url value(s)",
            titles.len(),
            urls.len()
        );
    }
    Ok(urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let link = EvidenceUrl::new(url.as_str());
            match titles.get(i) {
                Some(title) => link.with_title(title.as_str()),
                None => link,
            }
        })
        .collect())
}

fn author_or_default<'a>(session: &'a Session, author: Option<&'a str>) -> String {
    author
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(&session.config.author)
        .to_string()
}

pub fn ask(session: &Session, opts: AskOptions<'_>) -> Result<()> {
    let mut board = session.load_board()?;
    let id = board
        .ask(NewQuestion {
            text: opts.text.to_string(),
            side: opts.side.unwrap_or(session.config.default_side),
            author: author_or_default(session, opts.author),
            tag: opts.tag.map(str::to_string),
            evidence: opts.evidence,
        })
        .context("ask question")?;
    session.save_board(&board)?;
    println!("{id}");
    Ok(())
}

pub fn reply(session: &Session, opts: ReplyOptions<'_>) -> Result<()> {
    let mut board = session.load_board()?;
    let parent = PostId::new(opts.parent.trim());
    let id = board
        .reply(
            &parent,
            NewReply {
                text: opts.text.to_string(),
                author: author_or_default(session, opts.author),
                evidence: opts.evidence,
            },
        )
        .with_context(|| format!("reply in topic '{}'", session.topic))?;
    session.save_board(&board)?;
    println!("{id}");
    Ok(())
}

pub fn vote(session: &Session, id: &str, kind: VoteKind) -> Result<()> {
    let mut board = session.load_board()?;
    let id = PostId::new(id.trim());
    let votes = board
        .vote(&id, kind)
        .with_context(|| format!("vote in topic '{}'", session.topic))?;
    session.save_board(&board)?;
    println!("{id}  ▲ {}  ▼ {}", votes.up, votes.down);
    Ok(())
}
