//! Simple in-memory authentication with object/action privileges.
//!
//! Meant for projects that need a basic auth layer with little set-up and
//! no run-time dependencies. Not meant for mission-critical security.

/// Users, password hashing, privilege sets and the authenticator.
pub mod auth;
/// Hash settings loading.
pub mod config;
/// Subscriber set-up for applications embedding the library.
pub mod logging;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

pub use auth::{
    Authenticator, Grant, GrantSpec, HashAlgorithm, HashMaker, Hasher, Key, PrivilegeSet,
    PrivilegeSubject, UserRecord, UsersConfig,
};
pub use crate::config::HashSettings;
pub use kankri_error::{AuthError, AuthResult, ErrorExt, RecordField, StatusCode};

/// Builds an [`Authenticator`] with default hashing from a user table.
///
/// ```
/// use kankri::{authenticator_from_users, GrantSpec, UserRecord};
///
/// let auth = authenticator_from_users([(
///     "admin",
///     UserRecord::new("hunter2")
///         .with_grant("foo", GrantSpec::all())
///         .with_grant("bar", vec!["abc", "def", "ghi"])
///         .with_grant("baz", Vec::<String>::new()),
/// )])
/// .unwrap();
///
/// let privs = auth.authenticate("admin", "hunter2").unwrap();
/// assert!(privs.has("abc", "bar"));
/// assert!(!privs.has("anything", "baz"));
/// ```
pub fn authenticator_from_users<I, K>(users: I) -> AuthResult<Authenticator>
where
    I: IntoIterator<Item = (K, UserRecord)>,
    K: Into<Key>,
{
    Authenticator::new(users)
}
