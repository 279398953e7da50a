use std::{collections::HashMap, fmt, sync::Arc};

use tracing::{debug, trace};

use kankri_error::{AuthError, AuthResult, RecordField};

use super::{
    config::{UserRecord, UsersConfig},
    hasher::{DigestHashMaker, HashMaker, HashedSecret, Hasher},
    password::PasswordCheck,
    privilege::PrivilegeSet,
    Key,
};
use crate::config::HashSettings;

/// Authenticates users from a fixed in-memory table.
///
/// Everything is computed once in the constructor: a salted hasher per
/// user, the hash of each configured password and each user's
/// [`PrivilegeSet`]. After that the tables are read-only, so one instance
/// can be shared between threads without locking.
///
/// Plaintext passwords are dropped after hashing, but salts and hashes live
/// in process memory for the lifetime of the instance. Not meant for
/// high-security deployments.
pub struct Authenticator {
    hashers: HashMap<Key, Hasher>,
    passwords: HashMap<Key, HashedSecret>,
    privilege_sets: HashMap<Key, Arc<PrivilegeSet>>,
}

impl Authenticator {
    /// Builds an authenticator with SHA-256 and 16-byte random salts.
    pub fn new<I, K>(users: I) -> AuthResult<Self>
    where
        I: IntoIterator<Item = (K, UserRecord)>,
        K: Into<Key>,
    {
        Self::with_hash_maker(users, &DigestHashMaker::default())
    }

    /// Builds an authenticator whose per-user hashers come from `hash_maker`.
    ///
    /// If the same username appears more than once, the last record wins.
    pub fn with_hash_maker<I, K, M>(
        users: I,
        hash_maker: &M,
    ) -> AuthResult<Self>
    where
        I: IntoIterator<Item = (K, UserRecord)>,
        K: Into<Key>,
        M: HashMaker + ?Sized,
    {
        let users: HashMap<Key, UserRecord> =
            users.into_iter().map(|(name, record)| (name.into(), record)).collect();

        // Validate every record before touching the RNG.
        let mut records = Vec::with_capacity(users.len());
        for (name, record) in users {
            let password = record
                .password
                .ok_or_else(|| missing(&name, RecordField::Password))?;
            let specs = record
                .privileges
                .ok_or_else(|| missing(&name, RecordField::Privileges))?;
            records.push((name, password, specs));
        }

        let usernames: Vec<Key> = records.iter().map(|(name, ..)| name.clone()).collect();
        let mut made = hash_maker.make_hashers(&usernames);

        let mut hashers = HashMap::with_capacity(records.len());
        let mut passwords = HashMap::with_capacity(records.len());
        let mut privilege_sets = HashMap::with_capacity(records.len());

        for (name, password, specs) in records {
            let hasher = made
                .remove(&name)
                .ok_or_else(|| AuthError::MissingHasher {
                    username: name.to_string(),
                })?;

            let privileges = PrivilegeSet::from_specs(&specs)
                .map_err(|e| AuthError::InvalidGrant {
                    username: name.to_string(),
                    target: e.target.into_string(),
                    value: e.value,
                })?;

            if password.is_empty() {
                debug!(username = %name, "user has an empty password and can never authenticate");
            }

            passwords.insert(name.clone(), hasher.hash(password.as_bytes()));
            hashers.insert(name.clone(), hasher);
            privilege_sets.insert(name, Arc::new(privileges));
        }

        debug!(users = hashers.len(), "authenticator ready");

        Ok(Self {
            hashers,
            passwords,
            privilege_sets,
        })
    }

    /// Builds an authenticator from a parsed user table with default hashing.
    pub fn from_config(config: &UsersConfig) -> AuthResult<Self> {
        Self::from_config_with_settings(config, &HashSettings::default())
    }

    /// Like [`Authenticator::from_config`], salting and hashing as `settings`
    /// say. Settings outside the accepted salt range are rejected.
    pub fn from_config_with_settings(
        config: &UsersConfig,
        settings: &HashSettings,
    ) -> AuthResult<Self> {
        let maker = DigestHashMaker::try_from(settings).map_err(|e| {
            AuthError::InvalidHashSettings {
                reason: e.to_string(),
            }
        })?;
        Self::with_hash_maker(
            config
                .users
                .iter()
                .map(|(name, record)| (name, record.clone())),
            &maker,
        )
    }

    /// Checks `username`/`password` and returns the user's privileges.
    ///
    /// Every kind of rejection is reported as
    /// [`AuthError::AuthenticationFailure`]. An unknown username returns
    /// before any hasher runs.
    pub fn authenticate(
        &self,
        username: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> AuthResult<Arc<PrivilegeSet>> {
        let username = Key::from(username.as_ref());
        let password = password.as_ref();

        if !self.auth_ok(&username, password) {
            trace!(username = %username, "authentication rejected");
            return Err(AuthError::AuthenticationFailure);
        }

        trace!(username = %username, "authentication accepted");
        self.privilege_sets
            .get(&username)
            .cloned()
            .ok_or(AuthError::AuthenticationFailure)
    }

    fn auth_ok(
        &self,
        username: &Key,
        password: &str,
    ) -> bool {
        self.username_present(username) && self.password_ok(username, password)
    }

    fn username_present(
        &self,
        username: &Key,
    ) -> bool {
        self.hashers.contains_key(username) && self.passwords.contains_key(username)
    }

    fn password_ok(
        &self,
        username: &Key,
        password: &str,
    ) -> bool {
        // An empty candidate is never hashed, so the check sees it as absent.
        let hashed = match self.hashers.get(username) {
            Some(hasher) if !password.is_empty() => Some(hasher.hash(password.as_bytes())),
            _ => None,
        };
        PasswordCheck::new(Some(username), hashed.as_ref(), &self.passwords).is_ok()
    }

    pub fn contains_user(
        &self,
        username: impl AsRef<str>,
    ) -> bool {
        self.privilege_sets.contains_key(username.as_ref())
    }

    pub fn usernames(&self) -> impl Iterator<Item = &Key> {
        self.privilege_sets.keys()
    }

    pub fn len(&self) -> usize {
        self.privilege_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.privilege_sets.is_empty()
    }

    /// The hasher built for `username`, e.g. to inspect its salt.
    pub fn hasher_for(
        &self,
        username: impl AsRef<str>,
    ) -> Option<&Hasher> {
        self.hashers.get(username.as_ref())
    }

    /// The stored hash of `username`'s configured password.
    pub fn hashed_password_for(
        &self,
        username: impl AsRef<str>,
    ) -> Option<&HashedSecret> {
        self.passwords.get(username.as_ref())
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut names: Vec<&str> = self.usernames().map(Key::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Authenticator")
            .field("users", &names)
            .finish_non_exhaustive()
    }
}

fn missing(
    username: &Key,
    field: RecordField,
) -> AuthError {
    AuthError::MissingField {
        username: username.to_string(),
        field,
    }
}
