use crate::notion::client::RemoteError;
use thiserror::Error;

/// Everything that can stop or degrade a sync attempt.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Malformed frontmatter. Recovered inside the codec, never surfaced.
    #[error("frontmatter parse error: {0}")]
    Parse(String),

    /// The note could not be read before syncing.
    #[error("could not read document: {0}")]
    Read(String),

    #[error("network error: {0}")]
    Transport(String),

    /// Notion answered with a non-success status.
    #[error("Notion rejected the request ({status}): {message}")]
    RemoteRejection { status: u16, code: String, message: String },

    /// Local write-back failed after the remote write succeeded. The page
    /// exists remotely but the note does not know its id.
    #[error("write file error: {0}")]
    Persistence(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Transport(msg) => SyncError::Transport(msg),
            RemoteError::Decode(msg) => SyncError::Transport(format!("unreadable response: {}", msg)),
            RemoteError::Rejected {
                status,
                code,
                message,
            } => SyncError::RemoteRejection {
                status,
                code,
                message,
            },
        }
    }
}
