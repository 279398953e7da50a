use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use kankri_error::{AuthError, AuthResult};

use super::Key;

/// Grant string that stands for every privilege under a key.
pub const ALL_PRIVILEGES: &str = "all";

/// What a user holds under one resource key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Every privilege, including ones never listed anywhere.
    All,
    /// Exactly these privileges; may be empty.
    Only(HashSet<Key>),
}

impl Grant {
    pub fn only<I, T>(privileges: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Key>,
    {
        Grant::Only(privileges.into_iter().map(Into::into).collect())
    }

    pub fn permits(
        &self,
        privilege: &str,
    ) -> bool {
        match self {
            Grant::All => true,
            Grant::Only(set) => set.contains(privilege),
        }
    }
}

/// Grant as written in a user table: the string `"all"` or a list of
/// privilege names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrantSpec {
    Token(String),
    List(Vec<String>),
}

impl GrantSpec {
    pub fn all() -> Self {
        GrantSpec::Token(ALL_PRIVILEGES.to_string())
    }

    pub fn list<I, T>(privileges: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        GrantSpec::List(privileges.into_iter().map(Into::into).collect())
    }

    /// `None` for a single token other than `"all"`.
    pub fn to_grant(&self) -> Option<Grant> {
        match self {
            GrantSpec::Token(token) if token == ALL_PRIVILEGES => Some(Grant::All),
            GrantSpec::Token(_) => None,
            GrantSpec::List(list) => Some(Grant::only(list)),
        }
    }
}

impl From<&str> for GrantSpec {
    fn from(value: &str) -> Self {
        GrantSpec::Token(value.to_string())
    }
}

impl<T: Into<String>> From<Vec<T>> for GrantSpec {
    fn from(value: Vec<T>) -> Self {
        GrantSpec::list(value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid grant '{value}' for '{target}'")]
pub struct InvalidGrant {
    pub target: Key,
    pub value: String,
}

/// Check of one privilege under one target against a grant table.
#[derive(Debug)]
pub struct PrivilegeCheck<'a> {
    target: &'a str,
    requisite: &'a str,
    privileges: &'a HashMap<Key, Grant>,
}

impl<'a> PrivilegeCheck<'a> {
    pub fn new(
        target: &'a str,
        requisite: &'a str,
        privileges: &'a HashMap<Key, Grant>,
    ) -> Self {
        Self {
            target,
            requisite,
            privileges,
        }
    }

    pub fn check(
        target: &str,
        requisite: &str,
        privileges: &HashMap<Key, Grant>,
    ) -> bool {
        PrivilegeCheck::new(target, requisite, privileges).is_valid()
    }

    /// `true` if the target has a grant and that grant covers the requisite.
    pub fn is_valid(&self) -> bool {
        self.target_in_privileges() && self.has_privilege()
    }

    fn target_in_privileges(&self) -> bool {
        self.privileges.contains_key(self.target)
    }

    fn has_privilege(&self) -> bool {
        self.has_all() || self.has_direct()
    }

    fn has_all(&self) -> bool {
        matches!(self.privileges.get(self.target), Some(Grant::All))
    }

    fn has_direct(&self) -> bool {
        self.privileges
            .get(self.target)
            .is_some_and(|grant| grant.permits(self.requisite))
    }
}

/// The privileges one user holds, keyed by resource.
///
/// Immutable once built. Handed out by the authenticator as the capability
/// for an authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeSet {
    privileges: HashMap<Key, Grant>,
}

impl PrivilegeSet {
    pub fn new<I, K>(grants: I) -> Self
    where
        I: IntoIterator<Item = (K, Grant)>,
        K: Into<Key>,
    {
        Self {
            privileges: grants.into_iter().map(|(k, g)| (k.into(), g)).collect(),
        }
    }

    /// Normalizes a raw grant table.
    pub fn from_specs<'a, I, K>(specs: I) -> Result<Self, InvalidGrant>
    where
        I: IntoIterator<Item = (K, &'a GrantSpec)>,
        K: Into<Key>,
    {
        let mut privileges = HashMap::new();
        for (target, spec) in specs {
            let target = target.into();
            match spec.to_grant() {
                Some(grant) => {
                    privileges.insert(target, grant);
                }
                None => {
                    let value = match spec {
                        GrantSpec::Token(token) => token.clone(),
                        GrantSpec::List(list) => list.join(","),
                    };
                    return Err(InvalidGrant { target, value });
                }
            }
        }
        Ok(Self { privileges })
    }

    /// Whether `privilege` is held on `target`.
    ///
    /// A target with no entry and a target with an empty list both answer
    /// `false`.
    pub fn has(
        &self,
        privilege: impl AsRef<str>,
        target: impl AsRef<str>,
    ) -> bool {
        PrivilegeCheck::check(target.as_ref(), privilege.as_ref(), &self.privileges)
    }

    /// Fails with [`AuthError::InsufficientPrivilege`] unless
    /// [`has`](Self::has) holds. Note the argument order: target first.
    pub fn require(
        &self,
        target: impl AsRef<str>,
        privilege: impl AsRef<str>,
    ) -> AuthResult<()> {
        let (target, privilege) = (target.as_ref(), privilege.as_ref());
        if self.has(privilege, target) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPrivilege {
                target: target.to_string(),
                privilege: privilege.to_string(),
            })
        }
    }

    pub fn grant(
        &self,
        target: impl AsRef<str>,
    ) -> Option<&Grant> {
        self.privileges.get(target.as_ref())
    }

    pub fn targets(&self) -> impl Iterator<Item = &Key> {
        self.privileges.keys()
    }

    pub fn len(&self) -> usize {
        self.privileges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.privileges.is_empty()
    }
}
