//! Error types for the watch/sync pipeline.

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that can occur while watching a configuration file or syncing
/// its token to a destination.
#[derive(Error, Debug)]
pub enum WatchError {
    /// Reading, parsing or serializing credentials failed.
    ///
    /// Fatal on the initial one-shot read; during watching a later edit
    /// may fix the file, so the session survives it.
    #[error(transparent)]
    Credentials(#[from] arrkit_credentials::CredentialsError),

    /// The filesystem notification backend reported an error.
    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The notification event source closed without being cancelled.
    #[error("file watcher event source closed unexpectedly")]
    EventSourceClosed,

    /// The watch session's error stream closed without being cancelled,
    /// so failures could no longer be observed.
    #[error("watcher error stream closed unexpectedly")]
    ErrorStreamClosed,

    /// Writing the token to its destination failed.
    #[error("failed to write token to {destination}: {source}")]
    Write {
        destination: String,
        source: std::io::Error,
    },
}
