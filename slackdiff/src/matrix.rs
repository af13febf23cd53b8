//! Presence matrices built from fetched membership.
//!
//! Three shapes over the same data:
//! - [`channels_over_users`]: one row per channel where the selected users
//!   disagree (some in, some out).
//! - [`users_over_channels`]: one row per user, one column per channel.
//! - [`channel_listing`]: plain channel → member names.

use std::collections::HashSet;

use crate::directory::{Channel, User};
use crate::fetch::Membership;
use crate::reconcile::{Presence, ReconcileError, presence};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRow {
    pub label: String,
    /// One cell per matrix column.
    pub cells: Vec<Presence>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceMatrix {
    /// Header of the label column.
    pub corner: String,
    pub columns: Vec<String>,
    pub rows: Vec<PresenceRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelListing {
    pub channel: String,
    pub members: Vec<String>,
}

/// Channel rows, selected-user columns, disagreements only.
///
/// A channel shows up only when some but not all selected users are in
/// it. Channels whose membership is unknown are skipped.
pub fn channels_over_users(
    selected: &[User],
    channels: &[Channel],
    membership: &Membership,
) -> PresenceMatrix {
    let mut rows = Vec::new();

    for channel in channels {
        let Some(members) = membership.members_of(&channel.name) else {
            tracing::error!(channel = %channel.name, "channel has no members recorded");
            continue;
        };
        let names: HashSet<&str> = members.iter().map(|m| m.name.as_str()).collect();

        let cells: Vec<Presence> = selected
            .iter()
            .map(|u| Presence::from(names.contains(u.name.as_str())))
            .collect();

        let present = cells.iter().filter(|c| c.is_present()).count();
        if present == 0 || present == cells.len() {
            continue;
        }

        rows.push(PresenceRow {
            label: channel.name.clone(),
            cells,
        });
    }

    PresenceMatrix {
        corner: "channel".to_string(),
        columns: selected.iter().map(|u| u.name.clone()).collect(),
        rows,
    }
}

/// User rows, channel columns, every cell filled.
///
/// Each row is a merge-join of the sorted channel names against the
/// sorted names of the channels that user is in. Users whose channel
/// list is unknown are skipped.
pub fn users_over_channels(
    users: &[User],
    channels: &[Channel],
    membership: &Membership,
) -> Result<PresenceMatrix, ReconcileError> {
    let mut columns: Vec<String> = channels.iter().map(|c| c.name.clone()).collect();
    columns.sort();
    let known: HashSet<&str> = columns.iter().map(String::as_str).collect();

    let mut rows = Vec::with_capacity(users.len());
    for user in users {
        let Some(joined) = membership.channels_of(&user.name) else {
            tracing::error!(user = %user.name, "user has no channel recorded");
            continue;
        };

        // Channels outside the column set would stall the merge.
        let mut mine: Vec<&str> = joined
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| known.contains(name))
            .collect();
        mine.sort_unstable();
        mine.dedup();

        rows.push(PresenceRow {
            label: user.name.clone(),
            cells: presence(&columns, &mine)?,
        });
    }

    Ok(PresenceMatrix {
        corner: "username".to_string(),
        columns,
        rows,
    })
}

/// Every channel with its member names. Channels whose membership is
/// unknown are left out; a known-empty channel lists as `[]`.
pub fn channel_listing(channels: &[Channel], membership: &Membership) -> Vec<ChannelListing> {
    channels
        .iter()
        .filter_map(|channel| {
            let Some(members) = membership.members_of(&channel.name) else {
                tracing::error!(channel = %channel.name, "channel has no members recorded");
                return None;
            };
            Some(ChannelListing {
                channel: channel.name.clone(),
                members: members.iter().map(|u| u.name.clone()).collect(),
            })
        })
        .collect()
}
