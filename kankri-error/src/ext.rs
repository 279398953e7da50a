use std::{any::Any, error::Error};

use crate::StatusCode;

/// Extension for library errors (object-safe).
///
/// - status code extraction,
/// - a message that is safe to hand back to whoever supplied the input,
/// - a detailed message for logs.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Defaults to [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Lets callers downcast to the concrete error type.
    fn as_any(&self) -> &dyn Any;

    /// Safe message for the caller.
    ///
    /// Internal codes collapse to `"Internal error"` so implementation
    /// details never leak through it.
    fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::Unknown | StatusCode::Internal => "Internal error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Detailed message for logs. May contain identifiers such as usernames,
    /// never secrets.
    fn log_message(&self) -> String {
        format!("{self:?}")
    }

    fn type_name(&self) -> String {
        std::any::type_name::<Self>()
            .split("::")
            .last()
            .unwrap_or("Unknown")
            .to_string()
    }
}
