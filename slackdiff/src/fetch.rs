//! Concurrent membership fetch.
//!
//! One task per channel asks for its members, one task per user asks for
//! its channels. All tasks run at once and are joined by a single barrier;
//! nothing downstream starts until every task has finished, failed, or hit
//! its deadline. A failed task only loses its own entity.
//!
//! Tasks never touch shared state. Each returns its keyed result and the
//! orchestrator merges them one at a time after the join.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::directory::{Channel, Directory, User};
use crate::resolve::{index_by_id, resolve};

/// Default per-task deadline.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Upper bound on a single remote call. A task that runs longer is
    /// abandoned and reported as a failure.
    pub task_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            task_timeout: DEFAULT_TASK_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Channel,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Channel => write!(f, "channel"),
            EntityKind::User => write!(f, "user"),
        }
    }
}

/// One entity whose membership could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: EntityKind,
    /// Display name of the channel or user.
    pub name: String,
    pub reason: String,
}

/// Both membership views, as fetched.
///
/// A missing key means the fetch for that entity failed and its
/// membership is unknown. An empty list means it is known to be empty.
#[derive(Debug, Default)]
pub struct Membership {
    /// channel name → users in it
    pub channel_members: HashMap<String, Vec<User>>,
    /// user name → channels they are in
    pub user_channels: HashMap<String, Vec<Channel>>,
    pub failures: Vec<FetchFailure>,
}

impl Membership {
    pub fn members_of(&self, channel: &str) -> Option<&[User]> {
        self.channel_members.get(channel).map(Vec::as_slice)
    }

    pub fn channels_of(&self, user: &str) -> Option<&[Channel]> {
        self.user_channels.get(user).map(Vec::as_slice)
    }

    /// True when every task succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn absorb(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Members { channel, members } => {
                match self.channel_members.entry(channel) {
                    Entry::Vacant(slot) => {
                        slot.insert(members);
                    }
                    Entry::Occupied(slot) => {
                        tracing::warn!(channel = %slot.key(), "duplicate channel name, keeping first result");
                    }
                }
            }
            Outcome::Channels { user, channels } => match self.user_channels.entry(user) {
                Entry::Vacant(slot) => {
                    slot.insert(channels);
                }
                Entry::Occupied(slot) => {
                    tracing::warn!(user = %slot.key(), "duplicate user name, keeping first result");
                }
            },
            Outcome::Failed(failure) => {
                tracing::error!(
                    kind = %failure.kind,
                    name = %failure.name,
                    error = %failure.reason,
                    "can't fetch membership"
                );
                self.failures.push(failure);
            }
        }
    }
}

/// What a single fetch task hands back to the barrier.
enum Outcome {
    Members { channel: String, members: Vec<User> },
    Channels { user: String, channels: Vec<Channel> },
    Failed(FetchFailure),
}

/// Spawned task identity, used to account for tasks that die without
/// producing an [`Outcome`].
type TaskKey = (EntityKind, String);

/// Fetch channel → members and user → channels for the given entities.
///
/// Archived channels and deleted users are skipped. Never fails as a
/// whole: per-entity errors end up in [`Membership::failures`].
pub async fn fetch_membership<D>(
    directory: Arc<D>,
    channels: &[Channel],
    users: &[User],
    options: &FetchOptions,
) -> Membership
where
    D: Directory + 'static,
{
    let table = Arc::new(index_by_id(users));
    let deadline = options.task_timeout;
    let mut tasks = JoinSet::new();
    let mut pending: HashMap<TaskKey, String> = HashMap::new();

    for channel in channels.iter().filter(|c| !c.is_archived) {
        pending.insert((EntityKind::Channel, channel.id.clone()), channel.name.clone());

        let directory = Arc::clone(&directory);
        let table = Arc::clone(&table);
        let channel = channel.clone();
        tasks.spawn(async move {
            let key = (EntityKind::Channel, channel.id.clone());
            let result = timeout(deadline, directory.list_channel_members(&channel.id)).await;
            let outcome = match result {
                Ok(Ok(ids)) => Outcome::Members {
                    members: resolve(&ids, &table),
                    channel: channel.name,
                },
                Ok(Err(e)) => failed(EntityKind::Channel, channel.name, e.to_string()),
                Err(_) => failed(EntityKind::Channel, channel.name, timed_out(deadline)),
            };
            (key, outcome)
        });
    }

    for user in users.iter().filter(|u| !u.deleted) {
        pending.insert((EntityKind::User, user.id.clone()), user.name.clone());

        let directory = Arc::clone(&directory);
        let user = user.clone();
        tasks.spawn(async move {
            let key = (EntityKind::User, user.id.clone());
            let result = timeout(deadline, directory.list_user_channels(&user.id, true)).await;
            let outcome = match result {
                Ok(Ok(channels)) => Outcome::Channels {
                    channels: channels.into_iter().filter(|c| !c.is_archived).collect(),
                    user: user.name,
                },
                Ok(Err(e)) => failed(EntityKind::User, user.name, e.to_string()),
                Err(_) => failed(EntityKind::User, user.name, timed_out(deadline)),
            };
            (key, outcome)
        });
    }

    tracing::debug!(tasks = tasks.len(), "waiting for membership fetches");

    let mut membership = Membership::default();
    while let Some(joined) = tasks.join_next().await {
        // A task that panicked stays in `pending` and is reported below.
        let Ok((key, outcome)) = joined else {
            continue;
        };
        pending.remove(&key);
        membership.absorb(outcome);
    }

    for ((kind, _), name) in pending {
        membership.absorb(failed(kind, name, "fetch task aborted".to_string()));
    }

    if !membership.is_complete() {
        tracing::warn!(
            failed = membership.failures.len(),
            "some memberships could not be fetched and are left out"
        );
    }

    membership
}

fn failed(kind: EntityKind, name: String, reason: String) -> Outcome {
    Outcome::Failed(FetchFailure { kind, name, reason })
}

fn timed_out(deadline: Duration) -> String {
    format!("timed out after {deadline:?}")
}
