pub mod ext;
pub mod status_code;
pub mod types;

// Re-export everything so callers can write `kankri_error::AuthError`
// instead of reaching into the submodules.
pub use ext::*;
pub use status_code::*;
pub use types::*;

pub type AuthResult<T> = Result<T, AuthError>;
