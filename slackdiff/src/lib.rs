//! slackdiff: audit Slack channel membership.
//!
//! Fetches who is in which channel from both directions at once, then
//! lines the two views up so mismatches stand out:
//! - `directory`: the workspace capability and its Slack Web API client
//! - `fetch`: concurrent per-channel / per-user fan-out with a single join
//! - `resolve`: id → user lookup and `--users` selection
//! - `reconcile`: merge-join presence vectors over sorted names
//! - `matrix`: channel-by-user and user-by-channel views
//! - `render`: plain-text tables and listings
//! - `audit`: one full run, from user list to fetched membership
//! - `config`: command-line flags

pub mod audit;
pub mod config;
pub mod directory;
pub mod fetch;
pub mod matrix;
pub mod reconcile;
pub mod render;
pub mod resolve;
