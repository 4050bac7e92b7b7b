//! Board-level handlers: topics and check.

use anyhow::{Context, Result, bail};
use tark_core::store::ContentStore;

use super::Session;

pub fn topics(session: &Session) -> Result<()> {
    let topics = session.store.topics().context("list topics")?;
    if topics.is_empty() {
        println!("No topics found.");
    } else {
        for topic in topics {
            println!("{topic}");
        }
    }
    Ok(())
}

pub fn check(session: &Session) -> Result<()> {
    let board = session.load_board()?;
    let issues = board.validate();

    for issue in &issues {
        println!("{issue}");
    }

    let fatal = issues.iter().filter(|i| i.is_fatal()).count();
    if fatal > 0 {
        bail!("{fatal} malformed thread(s) in topic '{}'", board.topic);
    }
    println!(
        "OK: {} questions, {} posts, {} warnings",
        board.questions.len(),
        board.post_count(),
        issues.len()
    );
    Ok(())
}
