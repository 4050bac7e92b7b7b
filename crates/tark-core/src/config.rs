//! Configuration management for tark.
//!
//! Loads configuration from ${TARK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Board, Side};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for tark configuration and data directories.
    //!
    //! TARK_HOME resolution order:
    //! 1. TARK_HOME environment variable (if set)
    //! 2. ~/.config/tark (default)
    //! 3. ./.tark when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the tark home directory.
    pub fn tark_home() -> PathBuf {
        if let Ok(home) = std::env::var("TARK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".tark"),
            |h| h.join(".config").join("tark"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        tark_home().join("config.toml")
    }

    /// Returns the default directory for board files.
    pub fn boards_dir() -> PathBuf {
        tark_home().join("boards")
    }
}

/// Column headers for newly created boards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub left: String,
    pub right: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            left: Board::DEFAULT_LEFT_LABEL.to_string(),
            right: Board::DEFAULT_RIGHT_LABEL.to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Author name for new posts
    pub author: String,

    /// Topic used when none is given
    pub default_topic: String,

    /// Column for new questions when none is given
    pub default_side: Side,

    /// Width of each rendered column
    pub column_width: usize,

    /// Optional override for the boards directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boards_dir: Option<String>,

    /// Column headers for new boards
    pub labels: LabelsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: Self::DEFAULT_AUTHOR.to_string(),
            default_topic: Self::DEFAULT_TOPIC.to_string(),
            default_side: Side::Left,
            column_width: Self::DEFAULT_COLUMN_WIDTH,
            boards_dir: None,
            labels: LabelsConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_AUTHOR: &str = "Anonymous";
    const DEFAULT_TOPIC: &str = "general";
    const DEFAULT_COLUMN_WIDTH: usize = 40;
    /// Narrower columns cannot fit a card header.
    pub const MIN_COLUMN_WIDTH: usize = 16;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Directory where board files live.
    pub fn boards_dir(&self) -> PathBuf {
        match self.boards_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => paths::boards_dir(),
        }
    }

    /// Column width to render with: `requested` if given, otherwise the
    /// configured width, clamped to [`Config::MIN_COLUMN_WIDTH`].
    pub fn effective_column_width(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.column_width)
            .max(Self::MIN_COLUMN_WIDTH)
    }

    /// Creates an empty board using the configured labels.
    pub fn new_board(&self, topic: &str) -> Board {
        Board {
            left_label: self.labels.left.clone(),
            right_label: self.labels.right.clone(),
            ..Board::new(topic)
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Used by `xtask update-default-config` to keep `default_config.toml`
    /// in sync with `Config::default()`. The template supplies structure and
    /// comments; generated values overwrite its values.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let config = Config::default();
        let generated_toml =
            toml::to_string(&config).context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;

        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        overlay_generated(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

/// Writes generated values over the template's.
///
/// A replaced value keeps the template's decor, so trailing comments stay
/// attached. Keys the template lacks are appended.
fn overlay_generated(template: &mut toml_edit::Table, generated: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, item) in generated.iter() {
        if item.is_none() {
            continue;
        }
        if let Some(Item::Value(slot)) = template.get_mut(key)
            && let Item::Value(value) = item
        {
            let decor = slot.decor().clone();
            *slot = value.clone();
            *slot.decor_mut() = decor;
            continue;
        }
        if let Some(Item::Table(slot)) = template.get_mut(key)
            && let Item::Table(table) = item
        {
            overlay_generated(slot, table);
            continue;
        }
        template.insert(key, item.clone());
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.author, "Anonymous");
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "author = \"ana\"\ndefault_side = \"right\"\n[labels]\nleft = \"Yes\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.author, "ana");
        assert_eq!(config.default_side, Side::Right);
        assert_eq!(config.labels.left, "Yes");
        assert_eq!(config.labels.right, "Against");
        assert_eq!(config.column_width, 40);
    }

    #[test]
    fn test_load_invalid_side_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "default_side = \"middle\"\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "# mine").unwrap();

        assert!(Config::init(&config_path).is_err());
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "# mine");
    }

    #[test]
    fn test_generate_keeps_comments_and_defaults() {
        let generated = Config::generate().unwrap();
        assert!(generated.contains("# Width of each column"));
        let parsed: Config = toml::from_str(&generated).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_boards_dir_override_and_width_clamp() {
        let config = Config {
            boards_dir: Some("/tmp/boards".to_string()),
            column_width: 3,
            ..Config::default()
        };
        assert_eq!(config.boards_dir(), PathBuf::from("/tmp/boards"));
        assert_eq!(config.effective_column_width(None), Config::MIN_COLUMN_WIDTH);
        assert_eq!(config.effective_column_width(Some(40)), 40);
        assert_eq!(config.effective_column_width(Some(0)), Config::MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_new_board_uses_labels() {
        let config = Config {
            labels: LabelsConfig {
                left: "Tea".to_string(),
                right: "Coffee".to_string(),
            },
            ..Config::default()
        };
        let board = config.new_board("drinks");
        assert_eq!(board.label(Side::Left), "Tea");
        assert_eq!(board.label(Side::Right), "Coffee");
    }

    #[test]
    fn test_overlay_keeps_template_comments() {
        use toml_edit::DocumentMut;

        let mut template: DocumentMut = "a = 1 # keep\n[t]\nb = \"x\"\n".parse().unwrap();
        let generated: DocumentMut = "a = 2\nc = 3\n[t]\nb = \"y\"\n".parse().unwrap();
        overlay_generated(template.as_table_mut(), generated.as_table());

        let out = template.to_string();
        assert!(out.contains("a = 2 # keep"), "{out}");
        assert!(out.contains("c = 3"), "{out}");
        assert!(out.contains("b = \"y\""), "{out}");
        assert!(!out.contains("\"x\""), "{out}");
    }
}
