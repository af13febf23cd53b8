//! Workspace directory: users, channels, and who belongs where.
//!
//! [`Directory`] is the capability the rest of the crate consumes. Every
//! call can fail on its own; callers decide which failures are fatal.
//! [`SlackDirectory`] implements it over the Slack Web API.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Slack Web API root.
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

/// Page size requested from list endpoints. Only the first page is read.
const PAGE_LIMIT: &str = "1000";

/// A workspace member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Opaque, workspace-unique identifier (e.g. `U024BE7LH`).
    pub id: String,
    /// Display handle. Not guaranteed unique, but used as the join key.
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
}

impl User {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            real_name: None,
            deleted: false,
            is_bot: false,
        }
    }
}

/// A workspace channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
}

impl Channel {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            is_archived: false,
        }
    }

    pub fn archived(mut self) -> Self {
        self.is_archived = true;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("{method}: request failed: {source}")]
    Http {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method}: HTTP {status}")]
    Status {
        method: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("{method}: {error}")]
    Api { method: &'static str, error: String },
    #[error("{method}: can't decode response: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only view of a workspace's membership graph.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Every user in the workspace.
    async fn list_users(&self) -> Result<Vec<User>, DirectoryError>;

    /// Every channel visible to the credential.
    async fn list_channels(&self, exclude_archived: bool) -> Result<Vec<Channel>, DirectoryError>;

    /// Ids of the users in one channel.
    async fn list_channel_members(&self, channel_id: &str) -> Result<Vec<String>, DirectoryError>;

    /// Channels one user belongs to.
    async fn list_user_channels(
        &self,
        user_id: &str,
        exclude_archived: bool,
    ) -> Result<Vec<Channel>, DirectoryError>;
}

/// Every Slack response carries `ok`, and `error` when `ok` is false.
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsersList {
    members: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct ConversationsList {
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct ConversationMembers {
    members: Vec<String>,
}

/// Slack Web API client.
pub struct SlackDirectory {
    token: String,
    base_url: String,
    http: reqwest::Client,
}

impl SlackDirectory {
    pub fn new(token: String) -> Self {
        Self {
            token,
            base_url: DEFAULT_API_BASE.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Point the client at another API root (a proxy, or a local mock).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T, DirectoryError> {
        tracing::debug!(method, ?params, "calling Slack API");

        let resp = self
            .http
            .get(format!("{}/{method}", self.base_url))
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await
            .map_err(|source| DirectoryError::Http { method, source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DirectoryError::Status { method, status });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| DirectoryError::Http { method, source })?;

        let envelope: Envelope = serde_json::from_slice(&body)
            .map_err(|source| DirectoryError::Decode { method, source })?;
        if !envelope.ok {
            return Err(DirectoryError::Api {
                method,
                error: envelope.error.unwrap_or_else(|| "unknown_error".to_string()),
            });
        }

        serde_json::from_slice(&body).map_err(|source| DirectoryError::Decode { method, source })
    }
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[async_trait]
impl Directory for SlackDirectory {
    async fn list_users(&self) -> Result<Vec<User>, DirectoryError> {
        let list: UsersList = self.call("users.list", &[("limit", PAGE_LIMIT)]).await?;
        Ok(list.members)
    }

    async fn list_channels(&self, exclude_archived: bool) -> Result<Vec<Channel>, DirectoryError> {
        let list: ConversationsList = self
            .call(
                "conversations.list",
                &[
                    ("types", "public_channel,private_channel"),
                    ("exclude_archived", flag(exclude_archived)),
                    ("limit", PAGE_LIMIT),
                ],
            )
            .await?;
        Ok(keep_unarchived(list.channels, exclude_archived))
    }

    async fn list_channel_members(&self, channel_id: &str) -> Result<Vec<String>, DirectoryError> {
        let members: ConversationMembers = self
            .call(
                "conversations.members",
                &[("channel", channel_id), ("limit", PAGE_LIMIT)],
            )
            .await?;
        Ok(members.members)
    }

    async fn list_user_channels(
        &self,
        user_id: &str,
        exclude_archived: bool,
    ) -> Result<Vec<Channel>, DirectoryError> {
        let list: ConversationsList = self
            .call(
                "users.conversations",
                &[
                    ("user", user_id),
                    ("types", "public_channel,private_channel"),
                    ("exclude_archived", flag(exclude_archived)),
                    ("limit", PAGE_LIMIT),
                ],
            )
            .await?;
        Ok(keep_unarchived(list.channels, exclude_archived))
    }
}

/// Slack honors `exclude_archived`, but the flag is re-applied on receipt.
fn keep_unarchived(channels: Vec<Channel>, exclude_archived: bool) -> Vec<Channel> {
    if !exclude_archived {
        return channels;
    }
    channels.into_iter().filter(|c| !c.is_archived).collect()
}
