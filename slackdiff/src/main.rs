//! slackdiff: which Slack users are in which channels, and where they differ.
//!
//! Without `--users`, prints every channel with its members. With
//! `--users alice,bob`, prints only the channels where those users
//! disagree (or, with `--view users`, one row per user across every
//! channel).
//!
//! Requires a token via `--token` or the SLACK_TOKEN environment variable.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use slackdiff::config::{self, Config, View};
use slackdiff::directory::SlackDirectory;
use slackdiff::render::{self, Style};
use slackdiff::{audit, matrix};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    if config.version {
        println!("{}", config::version_string());
        return Ok(());
    }

    init_logging(&config)?;

    let token = match config.token() {
        Ok(token) => token.to_string(),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(config::EXIT_NO_TOKEN);
        }
    };

    let style = Style::detect(config.color);
    let directory = Arc::new(SlackDirectory::new(token).with_base_url(&config.api_url));

    let report = audit::run(directory, config.selection(), &config.fetch_options())
        .await
        .context("audit failed")?;

    let Some(selected) = &report.selected else {
        let listing = matrix::channel_listing(&report.channels, &report.membership);
        print!("{}", render::render_listing(&listing, style));
        return Ok(());
    };

    let table = match config.view {
        View::Channels => matrix::channels_over_users(selected, &report.channels, &report.membership),
        View::Users => matrix::users_over_channels(selected, &report.channels, &report.membership)?,
    };
    print!("{}", render::render_matrix(&table, style));

    Ok(())
}

/// Logs go to stderr so stdout only carries the report.
fn init_logging(config: &Config) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(config.log_directive()),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("can't install logger: {e}"))
}
