//! In-memory directory for exercising the fetch pipeline without Slack.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use slackdiff::directory::{Channel, Directory, DirectoryError, User};

pub fn user(id: &str, name: &str) -> User {
    User::new(id, name)
}

pub fn channel(id: &str, name: &str) -> Channel {
    Channel::new(id, name)
}

#[derive(Default)]
pub struct FakeDirectory {
    users: Vec<User>,
    channels: Vec<Channel>,
    /// channel id → member user ids
    members: HashMap<String, Vec<String>>,
    /// channel or user ids whose membership call returns an error
    failing: HashSet<String>,
    /// ids whose membership call never returns
    hanging: HashSet<String>,
    /// ids whose membership call panics
    panicking: HashSet<String>,
    fail_user_list: bool,
    fail_channel_list: bool,
    entity_calls: AtomicUsize,
    channel_list_calls: AtomicUsize,
    user_channel_requests: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_channel(mut self, channel: Channel, member_ids: &[&str]) -> Self {
        self.members.insert(
            channel.id.clone(),
            member_ids.iter().map(|s| s.to_string()).collect(),
        );
        self.channels.push(channel);
        self
    }

    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn hanging(mut self, id: &str) -> Self {
        self.hanging.insert(id.to_string());
        self
    }

    pub fn panicking(mut self, id: &str) -> Self {
        self.panicking.insert(id.to_string());
        self
    }

    pub fn failing_user_list(mut self) -> Self {
        self.fail_user_list = true;
        self
    }

    pub fn failing_channel_list(mut self) -> Self {
        self.fail_channel_list = true;
        self
    }

    /// Per-channel and per-user calls made so far.
    pub fn entity_calls(&self) -> usize {
        self.entity_calls.load(Ordering::SeqCst)
    }

    pub fn channel_list_calls(&self) -> usize {
        self.channel_list_calls.load(Ordering::SeqCst)
    }

    /// User ids passed to `list_user_channels`, sorted.
    pub fn user_channel_requests(&self) -> Vec<String> {
        let mut ids = self.user_channel_requests.lock().unwrap().clone();
        ids.sort();
        ids
    }

    async fn misbehave(&self, id: &str, method: &'static str) -> Result<(), DirectoryError> {
        self.entity_calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking.contains(id) {
            panic!("directory blew up on {id}");
        }
        if self.hanging.contains(id) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing.contains(id) {
            return Err(DirectoryError::Api {
                method,
                error: "internal_error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn list_users(&self) -> Result<Vec<User>, DirectoryError> {
        if self.fail_user_list {
            return Err(DirectoryError::Api {
                method: "users.list",
                error: "invalid_auth".to_string(),
            });
        }
        Ok(self.users.clone())
    }

    async fn list_channels(&self, exclude_archived: bool) -> Result<Vec<Channel>, DirectoryError> {
        self.channel_list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_channel_list {
            return Err(DirectoryError::Api {
                method: "conversations.list",
                error: "ratelimited".to_string(),
            });
        }
        Ok(self
            .channels
            .iter()
            .filter(|c| !(exclude_archived && c.is_archived))
            .cloned()
            .collect())
    }

    async fn list_channel_members(&self, channel_id: &str) -> Result<Vec<String>, DirectoryError> {
        self.misbehave(channel_id, "conversations.members").await?;
        Ok(self.members.get(channel_id).cloned().unwrap_or_default())
    }

    async fn list_user_channels(
        &self,
        user_id: &str,
        exclude_archived: bool,
    ) -> Result<Vec<Channel>, DirectoryError> {
        self.user_channel_requests
            .lock()
            .unwrap()
            .push(user_id.to_string());
        self.misbehave(user_id, "users.conversations").await?;
        Ok(self
            .channels
            .iter()
            .filter(|c| !(exclude_archived && c.is_archived))
            .filter(|c| {
                self.members
                    .get(&c.id)
                    .is_some_and(|ids| ids.iter().any(|id| id == user_id))
            })
            .cloned()
            .collect())
    }
}
