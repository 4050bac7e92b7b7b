//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use tark_core::config;
use tark_core::model::{Side, VoteKind};

mod commands;

#[derive(Parser)]
#[command(name = "tark")]
#[command(version)]
#[command(about = "Two-column debate threads in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debate topic to work on (default: `default_topic` from config)
    #[arg(long, global = true, env = "TARK_TOPIC", value_name = "NAME")]
    topic: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Ask a new question
    Ask {
        /// The question text
        #[arg(value_name = "TEXT")]
        text: String,

        /// Column for the question (left or right)
        #[arg(long)]
        side: Option<Side>,

        /// Category label shown next to the question
        #[arg(long)]
        tag: Option<String>,

        /// Override the author from config
        #[arg(long)]
        author: Option<String>,

        #[command(flatten)]
        evidence: EvidenceArgs,
    },

    /// Reply to a question or another reply
    Reply {
        /// The ID of the post to reply to
        #[arg(value_name = "PARENT_ID")]
        parent: String,

        /// The reply text
        #[arg(value_name = "TEXT")]
        text: String,

        /// Override the author from config
        #[arg(long)]
        author: Option<String>,

        #[command(flatten)]
        evidence: EvidenceArgs,
    },

    /// Vote a post up or down
    Vote {
        /// The ID of the post
        #[arg(value_name = "ID")]
        id: String,

        /// up or down
        #[arg(value_name = "DIRECTION")]
        direction: VoteKind,
    },

    /// Show threads as two columns
    Show {
        /// Only show posts whose text or metadata contains this (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,

        /// Only show the thread containing this post ID
        #[arg(long, value_name = "ID")]
        question: Option<String>,

        /// Print rows as JSON instead of columns
        #[arg(long)]
        json: bool,

        /// Override the column width from config
        #[arg(long, value_name = "N")]
        width: Option<usize>,
    },

    /// List questions of the topic
    List,

    /// List stored topics
    Topics,

    /// Check threads for malformed structure
    Check,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Evidence links attached to a new post.
#[derive(clap::Args)]
struct EvidenceArgs {
    /// Link backing the post (repeatable)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Title for the link at the same position (repeatable)
    #[arg(long = "url-title", value_name = "TITLE")]
    url_titles: Vec<String>,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    dispatch(cli)
}

fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, topic } = cli;

    // Config commands must work even when the config file does not parse.
    let open = || -> Result<commands::Session> {
        let config = config::Config::load().context("load config")?;
        Ok(commands::Session::open(config, topic.as_deref()))
    };

    match command {
        Commands::Ask {
            text,
            side,
            tag,
            author,
            evidence,
        } => commands::posts::ask(
            &open()?,
            commands::posts::AskOptions {
                text: &text,
                side,
                tag: tag.as_deref(),
                author: author.as_deref(),
                evidence: commands::posts::evidence_links(&evidence.urls, &evidence.url_titles)?,
            },
        ),
        Commands::Reply {
            parent,
            text,
            author,
            evidence,
        } => commands::posts::reply(
            &open()?,
            commands::posts::ReplyOptions {
                parent: &parent,
                text: &text,
                author: author.as_deref(),
                evidence: commands::posts::evidence_links(&evidence.urls, &evidence.url_titles)?,
            },
        ),
        Commands::Vote { id, direction } => commands::posts::vote(&open()?, &id, direction),
        Commands::Show {
            filter,
            question,
            json,
            width,
        } => commands::view::show(
            &open()?,
            &commands::view::ShowOptions {
                filter: filter.as_deref(),
                question: question.as_deref(),
                json,
                width,
            },
        ),
        Commands::List => commands::view::list(&open()?),
        Commands::Topics => commands::board::topics(&open()?),
        Commands::Check => commands::board::check(&open()?),

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
    }
}
