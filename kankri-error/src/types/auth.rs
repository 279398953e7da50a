use std::fmt;

use crate::{ErrorExt, StatusCode};

/// Which required field a user record lacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Password,
    Privileges,
}

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user, empty password or hash mismatch. Deliberately carries
    /// nothing about which check failed.
    AuthenticationFailure,
    /// `require` on a privilege the set does not hold.
    InsufficientPrivilege { target: String, privilege: String },
    /// A user record lacks `password` or `privileges`.
    MissingField { username: String, field: RecordField },
    /// The hash maker produced no hasher for a configured user.
    MissingHasher { username: String },
    /// A grant given as a single string that is not `"all"`.
    InvalidGrant {
        username: String,
        target: String,
        value: String,
    },
    /// Hash settings the default hash maker cannot work with.
    InvalidHashSettings { reason: String },
}

impl AuthError {
    /// Errors raised while building an authenticator rather than while
    /// using one.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::MissingHasher { .. }
                | Self::InvalidGrant { .. }
                | Self::InvalidHashSettings { .. }
        )
    }
}

impl fmt::Display for RecordField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Password => write!(f, "password"),
            Self::Privileges => write!(f, "privileges"),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::AuthenticationFailure => write!(f, "Authentication failed"),
            Self::InsufficientPrivilege { target, privilege } => {
                write!(f, "Insufficient privilege: '{privilege}' on '{target}'")
            }
            Self::MissingField { username, field } => {
                write!(f, "User '{username}' has no '{field}' entry")
            }
            Self::MissingHasher { username } => {
                write!(f, "Hash maker produced no hasher for user '{username}'")
            }
            Self::InvalidGrant {
                username,
                target,
                value,
            } => {
                write!(
                    f,
                    "Invalid grant '{value}' for '{target}' (user '{username}'): expected \"all\" or a list"
                )
            }
            Self::InvalidHashSettings { reason } => write!(f, "Invalid hash settings: {reason}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl ErrorExt for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationFailure => StatusCode::AuthFailed,
            Self::InsufficientPrivilege { .. } => StatusCode::PermissionDenied,
            Self::MissingField { .. }
            | Self::MissingHasher { .. }
            | Self::InvalidGrant { .. }
            | Self::InvalidHashSettings { .. } => StatusCode::InvalidConfig,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::AuthenticationFailure => "Authentication failed".to_string(),
            Self::InsufficientPrivilege { target, privilege } => {
                format!("Access denied: cannot {privilege} {target}")
            }
            // Configuration problems are the operator's business.
            Self::MissingField { .. }
            | Self::MissingHasher { .. }
            | Self::InvalidGrant { .. }
            | Self::InvalidHashSettings { .. } => "Internal error".to_string(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
