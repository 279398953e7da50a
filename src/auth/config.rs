use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::GrantSpec;

/// One entry of a user table.
///
/// Both fields are required by the authenticator. They are optional here
/// so a table with a missing field still parses and the authenticator can
/// report which user and field are at fault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub privileges: Option<HashMap<String, GrantSpec>>,
}

impl UserRecord {
    /// Record with a password and no privileges yet.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            privileges: Some(HashMap::new()),
        }
    }

    pub fn with_grant(
        mut self,
        target: impl Into<String>,
        grant: impl Into<GrantSpec>,
    ) -> Self {
        self.privileges
            .get_or_insert_with(HashMap::new)
            .insert(target.into(), grant.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum UsersConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory user table: username → record.
///
/// ```json
/// {
///   "admin": {
///     "password": "hunter2",
///     "privileges": { "foo": "all", "bar": ["abc", "def"], "baz": [] }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsersConfig {
    pub users: HashMap<String, UserRecord>,
}

impl UsersConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(
        mut self,
        username: impl Into<String>,
        record: UserRecord,
    ) -> Self {
        self.users.insert(username.into(), record);
        self
    }

    /// Parses a JSON user table that is already in memory.
    pub fn from_json(content: &str) -> Result<Self, UsersConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<(String, UserRecord)> for UsersConfig {
    fn from_iter<T: IntoIterator<Item = (String, UserRecord)>>(iter: T) -> Self {
        Self {
            users: iter.into_iter().collect(),
        }
    }
}
