// SPDX-License-Identifier: GPL-3.0-only

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No entry satisfied the lookup
    #[error("{0}")]
    NotFound(String),

    /// A dialog was closed without a decision
    #[error("cancelled by user")]
    UserCancelled,

    /// The application is busy and rejected the attempt
    #[error("can't do that right now")]
    Busy,

    /// The surface that started the task was destroyed
    #[error("surface is gone")]
    SurfaceGone,

    /// An entry group could not materialize its entries
    #[error("failed to load entries: {0}")]
    Load(String),

    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    #[error("failed to reap user data: {0}")]
    ReapFailed(String),

    #[error("favorites request failed: {0}")]
    Favorites(String),

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should be shown to the user as an error notice.
    ///
    /// Cancellation, busy rejections and destroyed surfaces are silent, and
    /// reap failures are only ever logged.
    pub fn is_user_visible(&self) -> bool {
        match self {
            Self::NotFound(_) | Self::Load(_) | Self::TransactionFailed(_) | Self::Favorites(_) => {
                true
            }
            Self::UserCancelled
            | Self::Busy
            | Self::SurfaceGone
            | Self::ReapFailed(_)
            | Self::Io { .. }
            | Self::Parse { .. }
            | Self::Serialize(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_follows_taxonomy() {
        assert!(Error::NotFound("x".into()).is_user_visible());
        assert!(Error::TransactionFailed("x".into()).is_user_visible());
        assert!(!Error::UserCancelled.is_user_visible());
        assert!(!Error::Busy.is_user_visible());
        assert!(!Error::SurfaceGone.is_user_visible());
        assert!(!Error::ReapFailed("x".into()).is_user_visible());
    }

    #[test]
    fn not_found_displays_message() {
        let err = Error::NotFound("No entry matching criteria found".into());
        assert_eq!(err.to_string(), "No entry matching criteria found");
    }
}
