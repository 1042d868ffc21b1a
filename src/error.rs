//! Error types for registration.

/// Errors raised while registering into a Lua environment.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// An argument was rejected before anything was registered.
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// Raised by the Lua environment itself.
    #[error(transparent)]
    Lua(#[from] mlua::Error),
}

impl RegistrationError {
    pub(crate) fn invalid(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistrationError>;
