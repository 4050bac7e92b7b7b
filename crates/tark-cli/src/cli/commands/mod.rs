//! CLI command handlers.

pub mod board;
pub mod config;
pub mod posts;
pub mod view;

use anyhow::{Context, Result};
use tark_core::config::Config;
use tark_core::model::Board;
use tark_core::store::{ContentStore, FileStore};

/// Loaded config plus the store and topic a command works on.
pub struct Session {
    pub config: Config,
    pub store: FileStore,
    pub topic: String,
}

impl Session {
    pub fn open(config: Config, topic: Option<&str>) -> Self {
        let topic = topic
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&config.default_topic)
            .to_string();
        let store = FileStore::new(config.boards_dir());
        tracing::debug!(%topic, dir = %store.dir().display(), "session opened");
        Self {
            config,
            store,
            topic,
        }
    }

    /// Loads the topic's board, or an empty one with the configured labels.
    pub fn load_board(&self) -> Result<Board> {
        let board = self
            .store
            .load(&self.topic)
            .with_context(|| format!("load board '{}'", self.topic))?;
        Ok(board.unwrap_or_else(|| self.config.new_board(&self.topic)))
    }

    pub fn save_board(&self, board: &Board) -> Result<()> {
        self.store
            .save(board)
            .with_context(|| format!("save board '{}'", board.topic))
    }
}
