//! hunter - a gamified personal task tracker.
//!
//! Dungeons are tasks with a difficulty rank; clearing them earns XP and
//! levels. This binary is the command-line front-end over the
//! `hunter-protocol` engine, `hunter-storage` profiles and `hunter-guidance`.

mod assistant;
mod cli;
mod commands;
mod render;
mod session;

use anyhow::Context;
use clap::Parser;
use hunter_config::Config;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::App;
use crate::session::Session;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "HUNTER_LOG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let session = Session::open(&config);
    let app = App::new(session, config.guidance);

    let output = app.execute(cli.command).await?;
    println!("{output}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            config.apply_env_overrides(|var| std::env::var(var).ok())?;
            config
        }
        None => Config::load().context("failed to load configuration")?,
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}
