mod cli;
mod render;

use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // stdout carries rendered boards; logs go to stderr
    let filter = EnvFilter::try_from_env("TARK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    if let Err(e) = cli::run() {
        eprintln!("{e:#}"); // pretty anyhow chain
        std::process::exit(1);
    }
}
