use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "tark maintainer tasks")]
struct Cli {
    #[command(subcommand)]
    command: Option<CommandName>,
}

#[derive(Debug, Default, Subcommand)]
enum CommandName {
    /// Update default_config.toml by running `tark config generate`.
    #[default]
    UpdateDefaultConfig,
    /// Fail if default_config.toml is out of date with `Config::default()`.
    CheckDefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    match command {
        CommandName::UpdateDefaultConfig => update_default_config(),
        CommandName::CheckDefaultConfig => check_default_config(),
    }
}

fn default_config_path(root: &Path) -> PathBuf {
    root.join("crates")
        .join("tark-core")
        .join("default_config.toml")
}

/// Runs `tark config generate` with an isolated TARK_HOME and returns its stdout.
fn generate_config(root: &Path) -> Result<Vec<u8>> {
    let temp_dir = tempfile::tempdir().context("create temp dir for TARK_HOME")?;

    let output = Command::new("cargo")
        .current_dir(root)
        .env("TARK_HOME", temp_dir.path())
        .arg("run")
        .arg("-p")
        .arg("tark")
        .arg("--")
        .arg("config")
        .arg("generate")
        .output()
        .context("run `cargo run -p tark -- config generate`")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("config generate failed: {}", stderr);
    }
    Ok(output.stdout)
}

fn update_default_config() -> Result<()> {
    let root = project_root()?;
    let dest = default_config_path(&root);
    let generated = generate_config(&root)?;

    fs::write(&dest, &generated)
        .with_context(|| format!("write config to {}", dest.display()))?;

    println!("Updated {}", dest.display());
    Ok(())
}

fn check_default_config() -> Result<()> {
    let root = project_root()?;
    let path = default_config_path(&root);
    let generated = generate_config(&root)?;
    let current = fs::read(&path).with_context(|| format!("read {}", path.display()))?;

    if current != generated {
        bail!(
            "{} is stale; run `cargo run -p xtask -- update-default-config`",
            path.display()
        );
    }

    println!("{} is up to date", path.display());
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    // crates/xtask -> workspace root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .ancestors()
        .nth(2)
        .context("locate workspace root from CARGO_MANIFEST_DIR")?;
    Ok(root.to_path_buf())
}
