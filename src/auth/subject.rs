use kankri_error::AuthResult;

use super::PrivilegeSet;

/// Something that can be the target of a privilege check.
///
/// Implementors name the resource key they are filed under; the provided
/// methods look the operation up in a [`PrivilegeSet`] under that key.
pub trait PrivilegeSubject {
    fn privilege_key(&self) -> &str;

    /// Whether `privileges` allows `operation` on this subject.
    fn can(
        &self,
        operation: &str,
        privileges: &PrivilegeSet,
    ) -> bool {
        privileges.has(operation, self.privilege_key())
    }

    /// Like [`can`](Self::can), but fails with
    /// [`AuthError::InsufficientPrivilege`](kankri_error::AuthError::InsufficientPrivilege).
    fn fail_if_cannot(
        &self,
        operation: &str,
        privileges: &PrivilegeSet,
    ) -> AuthResult<()> {
        privileges.require(self.privilege_key(), operation)
    }
}
