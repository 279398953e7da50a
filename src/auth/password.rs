use std::collections::HashMap;

use super::Key;

/// Check of one username/password pair against a password table.
///
/// Plain equality over whatever secret type the table stores: plaintext,
/// hashes, anything `AsRef<[u8]> + PartialEq`. Hashing and key
/// normalization happen before this, in the authenticator. The comparison
/// is not constant-time.
#[derive(Debug)]
pub struct PasswordCheck<'a, S> {
    username: Option<&'a Key>,
    password: Option<&'a S>,
    passwords: &'a HashMap<Key, S>,
}

impl<'a, S> PasswordCheck<'a, S>
where
    S: AsRef<[u8]> + PartialEq,
{
    pub fn new(
        username: Option<&'a Key>,
        password: Option<&'a S>,
        passwords: &'a HashMap<Key, S>,
    ) -> Self {
        Self {
            username,
            password,
            passwords,
        }
    }

    /// `true` when both credentials are present and non-empty, the user is
    /// known and the stored secret equals the candidate.
    pub fn is_ok(&self) -> bool {
        self.auth_present() && self.user_known() && self.password_match()
    }

    fn auth_present(&self) -> bool {
        self.username_present() && self.password_present()
    }

    fn username_present(&self) -> bool {
        self.username.is_some_and(|u| !u.is_empty())
    }

    fn password_present(&self) -> bool {
        self.password.is_some_and(|p| !p.as_ref().is_empty())
    }

    fn user_known(&self) -> bool {
        self.username
            .is_some_and(|u| self.passwords.contains_key(u))
    }

    fn password_match(&self) -> bool {
        match (self.username, self.password) {
            (Some(u), Some(p)) => self.passwords.get(u) == Some(p),
            _ => false,
        }
    }
}

/// Builds and runs a [`PasswordCheck`].
pub fn check<S>(
    username: Option<&Key>,
    password: Option<&S>,
    passwords: &HashMap<Key, S>,
) -> bool
where
    S: AsRef<[u8]> + PartialEq,
{
    PasswordCheck::new(username, password, passwords).is_ok()
}
