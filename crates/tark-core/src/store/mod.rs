//! Board persistence.
//!
//! The layout engine never touches a store: callers load a [`Board`] snapshot,
//! lay it out, and save it back after appending posts.

mod snapshot;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};

use self::snapshot::{BoardSnapshot, TopicOnly};
use crate::model::Board;

/// Source and sink of board snapshots.
pub trait ContentStore {
    /// Loads the board for `topic`; `None` if nothing is stored yet.
    fn load(&self, topic: &str) -> Result<Option<Board>>;
    /// Replaces the stored board for `board.topic`.
    fn save(&self, board: &Board) -> Result<()>;
    /// Lists stored topics, sorted.
    fn topics(&self) -> Result<Vec<String>>;
}

/// Stores each board as pretty JSON at `{dir}/{slug}.json`.
///
/// Distinct topics can share a slug; the file records its topic and a
/// mismatch is an error on both load and save.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn board_path(&self, topic: &str) -> PathBuf {
        self.dir.join(format!("{}.json", topic_slug(topic)))
    }
}

impl FileStore {
    /// Topic recorded in the file at `path`, if the file exists.
    fn stored_topic(path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read board from {}", path.display()))?;
        let stored: TopicOnly = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse board from {}", path.display()))?;
        Ok(Some(stored.topic))
    }
}

impl ContentStore for FileStore {
    fn load(&self, topic: &str) -> Result<Option<Board>> {
        let path = self.board_path(topic);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no stored board");
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read board from {}", path.display()))?;
        let snapshot: BoardSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse board from {}", path.display()))?;
        if snapshot.topic != topic {
            bail!(
                "{} holds topic '{}', not '{topic}'",
                path.display(),
                snapshot.topic
            );
        }
        let board = snapshot
            .into_board()
            .with_context(|| format!("Failed to rebuild board from {}", path.display()))?;
        Ok(Some(board))
    }

    fn save(&self, board: &Board) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {}", self.dir.display()))?;

        let path = self.board_path(&board.topic);
        if let Some(stored) = Self::stored_topic(&path)?
            && stored != board.topic
        {
            bail!(
                "{} already holds topic '{stored}', refusing to overwrite it with '{}'",
                path.display(),
                board.topic
            );
        }
        let json = serde_json::to_string_pretty(&BoardSnapshot::from_board(board))
            .context("serialize board")?;

        // Temp file + rename so a crash never leaves a half-written board.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write board to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        tracing::info!(path = %path.display(), posts = board.post_count(), "board saved");
        Ok(())
    }

    fn topics(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut topics = Vec::new();
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list {}", self.dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            // The stored topic name wins over the file name.
            match Self::stored_topic(&path) {
                Ok(Some(topic)) => topics.push(topic),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable board");
                }
            }
        }
        topics.sort();
        Ok(topics)
    }
}

/// Keeps boards in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    boards: Mutex<BTreeMap<String, Board>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryStore {
    fn load(&self, topic: &str) -> Result<Option<Board>> {
        let boards = self
            .boards
            .lock()
            .map_err(|_poisoned| anyhow!("board store lock poisoned"))?;
        Ok(boards.get(topic).cloned())
    }

    fn save(&self, board: &Board) -> Result<()> {
        let mut boards = self
            .boards
            .lock()
            .map_err(|_poisoned| anyhow!("board store lock poisoned"))?;
        boards.insert(board.topic.clone(), board.clone());
        Ok(())
    }

    fn topics(&self) -> Result<Vec<String>> {
        let boards = self
            .boards
            .lock()
            .map_err(|_poisoned| anyhow!("board store lock poisoned"))?;
        Ok(boards.keys().cloned().collect())
    }
}

/// File-name-safe form of a topic: lowercase ASCII alphanumerics joined by `-`.
pub fn topic_slug(topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    let mut pending_dash = false;
    for ch in topic.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("board");
    }
    slug
}
