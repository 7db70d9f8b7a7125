//! Error type for the switching core.
//!
//! Warnings (token shape mismatch, missing backup, already on the target
//! provider) are not errors. They go to the [`Sink`](crate::ui::Sink) and show
//! up as outcome variants instead.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize document")]
    Serialize(#[source] serde_json::Error),

    #[error("token cannot be empty")]
    EmptyCredential,

    #[error("failed to read input: {message}")]
    Prompt { message: String },

    #[error("failed to back up Anthropic config (web login token)")]
    Backup(#[source] Box<Error>),
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
