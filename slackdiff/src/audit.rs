//! End-to-end membership audit: snapshot the directory, validate the
//! selection, fan out, and hand back everything the views need.

use std::sync::Arc;

use crate::directory::{Channel, Directory, DirectoryError, User};
use crate::fetch::{FetchOptions, Membership, fetch_membership};
use crate::resolve::{SelectionError, select_users};

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("can't list users: {0}")]
    Users(#[source] DirectoryError),
    #[error("can't list channels: {0}")]
    Channels(#[source] DirectoryError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Everything gathered by one audit run.
#[derive(Debug)]
pub struct Report {
    /// All users, sorted by name.
    pub users: Vec<User>,
    /// Non-archived channels, sorted by name.
    pub channels: Vec<Channel>,
    /// Users picked with `--users`, sorted by name. `None` when no
    /// selection was made.
    pub selected: Option<Vec<User>>,
    pub membership: Membership,
}

/// Run an audit against `directory`.
///
/// Listing users and channels are prerequisites: if either fails the
/// audit fails. The selection is checked against the user list before any
/// per-entity fetch starts. Per-entity failures only show up in
/// [`Membership::failures`].
pub async fn run<D>(
    directory: Arc<D>,
    selection: Option<&[String]>,
    options: &FetchOptions,
) -> Result<Report, AuditError>
where
    D: Directory + 'static,
{
    let mut users = directory.list_users().await.map_err(AuditError::Users)?;
    users.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::info!(users = users.len(), "listed users");

    let selected = selection
        .map(|names| select_users(names, &users))
        .transpose()?;

    let mut channels = directory
        .list_channels(true)
        .await
        .map_err(AuditError::Channels)?;
    channels.retain(|c| !c.is_archived);
    channels.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::info!(channels = channels.len(), "listed channels");

    let membership = fetch_membership(directory, &channels, &users, options).await;

    Ok(Report {
        users,
        channels,
        selected,
        membership,
    })
}
