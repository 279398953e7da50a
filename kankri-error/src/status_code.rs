use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "extras")]
use strum_macros::{AsRefStr, EnumIter};

/// Status codes used to categorize errors.
///
/// # Ranges:
/// - 1xxx: general errors, misconfiguration
/// - 3xxx: authentication / permissions
///
/// `num_enum::TryFromPrimitive` provides `TryFrom<u32>`, so a code that
/// crossed a process boundary as a bare number can be turned back into a
/// variant.
#[cfg_attr(feature = "extras", derive(AsRefStr, EnumIter))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 1xxx: general ===
    Unknown = 1000,
    Internal = 1003,
    InvalidConfig = 1006,

    // === 3xxx: auth / permissions ===
    AuthFailed = 3000,
    PermissionDenied = 3001,
}

impl StatusCode {
    /// Numeric representation of the code.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Returns `None` if `v` does not name any variant.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Name of the range the code belongs to.
    pub fn category(&self) -> &'static str {
        match self.code() {
            3000..=3999 => "auth",
            _ => "general",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}
