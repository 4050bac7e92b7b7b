//! Debate data model.
//!
//! A [`Board`] holds the questions of one debate topic. Every question owns an
//! ordered tree of replies, and every reply sits on the column opposite to its
//! parent.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Column a post is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    /// Returns the opposite column.
    pub fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            other => Err(format!("unknown side '{other}' (expected left or right)")),
        }
    }
}

/// Opaque post identifier, unique for the lifetime of a board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    const QUESTION_PREFIX: &str = "q";
    const REPLY_PREFIX: &str = "r";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh question id (`q-<uuid>`).
    pub fn generate_question() -> Self {
        Self::generate(Self::QUESTION_PREFIX)
    }

    /// Generates a fresh reply id (`r-<uuid>`).
    pub fn generate_reply() -> Self {
        Self::generate(Self::REPLY_PREFIX)
    }

    fn generate(prefix: &str) -> Self {
        Self(format!("{prefix}-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display form: the prefix plus the first 8 characters after it.
    ///
    /// Ids without a `-` separator are truncated to 8 characters.
    pub fn short(&self) -> String {
        match self.0.split_once('-') {
            Some((prefix, rest)) => {
                let head: String = rest.chars().take(8).collect();
                format!("{prefix}-{head}")
            }
            None => self.0.chars().take(8).collect(),
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Up/down vote tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Votes {
    pub up: u32,
    pub down: u32,
}

impl Votes {
    pub fn score(self) -> i64 {
        i64::from(self.up) - i64::from(self.down)
    }
}

/// Vote direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Up,
    Down,
}

impl std::str::FromStr for VoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "+" => Ok(VoteKind::Up),
            "down" | "-" => Ok(VoteKind::Down),
            other => Err(format!("unknown vote '{other}' (expected up or down)")),
        }
    }
}

/// An external link offered as evidence, e.g. an article or a video.
///
/// URLs are kept as given; they are neither fetched nor validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl EvidenceUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title if present, otherwise the URL.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }
}

/// A question or reply node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub side: Side,
    pub author: String,
    /// Display timestamp, fixed at creation.
    pub timestamp: String,
    pub votes: Votes,
    pub replies: Vec<Post>,
    /// Category label; only set on questions.
    pub tag: Option<String>,
    /// Supporting links, in the order they were given.
    pub evidence: Vec<EvidenceUrl>,
}

impl Post {
    /// Creates a question post stamped with the current local time.
    pub fn question(text: impl Into<String>, side: Side, author: impl Into<String>) -> Self {
        Self {
            id: PostId::generate_question(),
            text: text.into(),
            side,
            author: author.into(),
            timestamp: format_timestamp(Local::now()),
            votes: Votes::default(),
            replies: Vec::new(),
            tag: None,
            evidence: Vec::new(),
        }
    }

    /// Creates a reply to `parent`, placed on the opposite column.
    pub fn reply_to(parent: &Post, text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: PostId::generate_reply(),
            text: text.into(),
            side: parent.side.flip(),
            author: author.into(),
            timestamp: format_timestamp(Local::now()),
            votes: Votes::default(),
            replies: Vec::new(),
            tag: None,
            evidence: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Counts every post in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(post) = stack.pop() {
            count += 1;
            stack.extend(post.replies.iter());
        }
        count
    }

    /// Finds a post by id in this subtree (pre-order).
    pub fn find(&self, id: &PostId) -> Option<&Post> {
        let mut stack = vec![self];
        while let Some(post) = stack.pop() {
            if &post.id == id {
                return Some(post);
            }
            stack.extend(post.replies.iter().rev());
        }
        None
    }

    /// Like [`Post::find`], also returning the depth below `self`.
    pub fn find_with_depth(&self, id: &PostId) -> Option<(&Post, usize)> {
        let mut stack = vec![(self, 0)];
        while let Some((post, depth)) = stack.pop() {
            if &post.id == id {
                return Some((post, depth));
            }
            stack.extend(post.replies.iter().rev().map(|r| (r, depth + 1)));
        }
        None
    }

    /// Mutable variant of [`Post::find`].
    pub fn find_mut(&mut self, id: &PostId) -> Option<&mut Post> {
        if &self.id == id {
            return Some(self);
        }
        self.replies.iter_mut().find_map(|reply| reply.find_mut(id))
    }
}

/// Formats a timestamp the way posts display it.
pub fn format_timestamp(ts: DateTime<Local>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// All questions of one debate topic.
///
/// Persisted through [`crate::store`], which owns the on-disk shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub topic: String,
    pub left_label: String,
    pub right_label: String,
    pub questions: Vec<Post>,
}

impl Board {
    pub const DEFAULT_LEFT_LABEL: &str = "For";
    pub const DEFAULT_RIGHT_LABEL: &str = "Against";

    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            left_label: Self::DEFAULT_LEFT_LABEL.to_string(),
            right_label: Self::DEFAULT_RIGHT_LABEL.to_string(),
            questions: Vec::new(),
        }
    }

    /// Returns the column label for `side`.
    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left_label,
            Side::Right => &self.right_label,
        }
    }

    /// Total number of posts (questions and replies).
    pub fn post_count(&self) -> usize {
        self.questions.iter().map(Post::subtree_len).sum()
    }
}
