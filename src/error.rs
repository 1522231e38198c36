use std::path::PathBuf;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NonoError>;

/// Closed error taxonomy for every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum NonoError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("wrong kind for {path}: {reason}")]
    WrongKind { path: PathBuf, reason: String },

    #[error("invalid: {reason}")]
    Invalid { reason: String },

    #[error("unsupported: {reason}")]
    Unsupported { reason: String },

    #[error("enforce failed: {message}")]
    EnforceFailed { message: String },

    #[error("apply() was already called in this process")]
    AlreadyApplied,
}

impl NonoError {
    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn wrong_kind(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::WrongKind {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    pub(crate) fn enforce_failed(message: impl Into<String>) -> Self {
        Self::EnforceFailed {
            message: message.into(),
        }
    }
}
