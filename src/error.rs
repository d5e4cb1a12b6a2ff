//! Error types for ttybbs.

use thiserror::Error;

/// Common error type for ttybbs.
#[derive(Error, Debug)]
pub enum BbsError {
    /// No board with the given name exists.
    #[error("board not found: {0}")]
    BoardNotFound(String),

    /// The board exists but holds no post with the given ID.
    #[error("post {id} not found in board {board}")]
    PostNotFound {
        /// Board that was searched.
        board: String,
        /// Requested post ID.
        id: u64,
    },

    /// Post title is empty after trimming.
    #[error("title is required")]
    EmptyTitle,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode or decode error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Encryption, decryption or key error.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The board's post ID counter cannot advance any further.
    #[error("post IDs exhausted in board {0}")]
    IdsExhausted(String),

    /// Post file written by a newer format version.
    #[error("unsupported post file version {0}")]
    UnsupportedVersion(u32),

    /// A store operation failed while carrying out a repository mutation.
    #[error("{context}: {source}")]
    Persist {
        /// What the repository was doing.
        context: String,
        /// Underlying store failure.
        #[source]
        source: Box<BbsError>,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BbsError {
    /// Wrap a store failure with operation context.
    pub fn persist(context: impl Into<String>, source: BbsError) -> Self {
        BbsError::Persist {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for ttybbs operations.
pub type Result<T> = std::result::Result<T, BbsError>;
