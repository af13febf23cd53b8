//! Identifier → user resolution, and the `--users` selection.

use std::collections::{BTreeSet, HashMap};

use crate::directory::User;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no user names given")]
    Empty,
    #[error("asked for {asked:?} but these users don't exist or are deactivated: {}", .missing.join(", "))]
    Unknown {
        asked: Vec<String>,
        missing: Vec<String>,
    },
}

/// Build an id → user lookup table.
pub fn index_by_id(users: &[User]) -> HashMap<String, User> {
    users.iter().map(|u| (u.id.clone(), u.clone())).collect()
}

/// Map ids to users, preserving order. Unknown ids are skipped.
pub fn resolve(ids: &[String], table: &HashMap<String, User>) -> Vec<User> {
    ids.iter()
        .filter_map(|id| {
            let user = table.get(id);
            if user.is_none() {
                tracing::debug!(user_id = %id, "user id not found");
            }
            user.cloned()
        })
        .collect()
}

/// Pick the users named in `names` out of the full user list.
///
/// Blank names are ignored and duplicates collapse. The result is sorted
/// by name. Every requested name must match a user; otherwise nothing is
/// selected and the error lists the missing names. Deleted accounts never
/// match, since their channels are not fetched; when several live users
/// share a name, the first one wins.
pub fn select_users(names: &[String], users: &[User]) -> Result<Vec<User>, SelectionError> {
    let asked: BTreeSet<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    if asked.is_empty() {
        return Err(SelectionError::Empty);
    }

    let mut selected = Vec::with_capacity(asked.len());
    let mut missing = Vec::new();
    for name in &asked {
        let found = users
            .iter()
            .find(|u| u.name == *name && !u.deleted);
        match found {
            Some(user) => selected.push(user.clone()),
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(SelectionError::Unknown {
            asked: asked.iter().map(|n| n.to_string()).collect(),
            missing,
        });
    }
    Ok(selected)
}
