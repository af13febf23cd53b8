//! Command-line configuration.
//!
//! The token comes from `--token` or `SLACK_TOKEN`; the flag wins.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::fetch::FetchOptions;

/// Exit status when no token was supplied.
pub const EXIT_NO_TOKEN: i32 = 124;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// One row per channel where the selected users disagree.
    Channels,
    /// One row per selected user, one column per channel.
    Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("either use --token or set SLACK_TOKEN")]
    MissingToken,
}

#[derive(Parser, Debug)]
#[command(
    name = "slackdiff",
    about = "Show which Slack users are in which channels, and where they differ",
    disable_version_flag = true
)]
pub struct Config {
    /// Slack OAuth token, create one at https://api.slack.com/apps
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Comma-separated list of users to compare. Without it, every channel
    /// is listed with its members.
    #[arg(long, value_delimiter = ',')]
    pub users: Option<Vec<String>>,

    /// Matrix shape used with --users
    #[arg(long, value_enum, default_value_t = View::Channels)]
    pub view: View,

    /// Per-request deadline in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Slack API root
    #[arg(long, default_value = crate::directory::DEFAULT_API_BASE)]
    pub api_url: String,

    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Log debug details to stderr
    #[arg(long)]
    pub debug: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Print version and exit
    #[arg(long)]
    pub version: bool,
}

impl Config {
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    /// Users named with `--users`. A flag with only blank names selects
    /// nobody and falls back to the plain listing.
    pub fn selection(&self) -> Option<&[String]> {
        self.users
            .as_deref()
            .filter(|names| names.iter().any(|n| !n.trim().is_empty()))
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            task_timeout: Duration::from_secs(self.timeout),
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "slackdiff=debug"
        } else {
            "slackdiff=info"
        }
    }
}

/// `version (commit …, built on …)`; commit and date are stamped at build
/// time through `SLACKDIFF_COMMIT` and `SLACKDIFF_BUILD_DATE`.
pub fn version_string() -> String {
    format!(
        "{} (commit {}, built on {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("SLACKDIFF_COMMIT").unwrap_or("none"),
        option_env!("SLACKDIFF_BUILD_DATE").unwrap_or("unknown"),
    )
}
