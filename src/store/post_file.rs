//! Per-board post files for ttybbs.
//!
//! Each board is stored in its own file holding a versioned envelope:
//!
//! ```text
//! {
//!   "version": 1,
//!   "board": "general",
//!   "posts": [ { "ID": 1, "Title": ..., "Comments": [ ... ] } ]
//! }
//! ```
//!
//! When a cipher is configured the serialized envelope is sealed before it
//! is written. Loading tries to open the sealed form first and falls back to
//! plaintext JSON, so boards saved before encryption was enabled still load.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::atomic::write_atomic;
use super::PostStore;
use crate::board::Post;
use crate::crypto::PostCipher;
use crate::{BbsError, Result};

/// Current post file format version.
pub const POST_FILE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    board: &'a str,
    posts: &'a [Post],
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    version: u32,
    #[allow(dead_code)]
    #[serde(default)]
    board: String,
    #[serde(default)]
    posts: Vec<Post>,
}

/// Post lists stored as one JSON file per board.
#[derive(Debug, Clone)]
pub struct PostFile {
    dir: PathBuf,
    cipher: Option<PostCipher>,
}

impl PostFile {
    /// Create a plaintext post store under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cipher: None,
        }
    }

    /// Seal every file written from now on with `cipher`.
    pub fn with_cipher(mut self, cipher: PostCipher) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Get the file path for a board.
    ///
    /// The board name is percent-encoded so names containing path separators
    /// stay inside the posts directory.
    pub fn path_for(&self, board: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(board)))
    }

    fn decode(&self, data: Vec<u8>) -> Result<Vec<Post>> {
        let plaintext = match &self.cipher {
            Some(cipher) => cipher.open(&data).unwrap_or(data),
            None => data,
        };

        let envelope: Envelope = serde_json::from_slice(&plaintext)?;
        if envelope.version > POST_FILE_VERSION {
            return Err(BbsError::UnsupportedVersion(envelope.version));
        }
        Ok(envelope.posts)
    }
}

impl PostStore for PostFile {
    fn load(&self, board: &str) -> Result<Vec<Post>> {
        let data = match fs::read(self.path_for(board)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        self.decode(data)
    }

    fn save(&self, board: &str, posts: &[Post]) -> Result<()> {
        let envelope = EnvelopeRef {
            version: POST_FILE_VERSION,
            board,
            posts,
        };
        let mut data = serde_json::to_vec_pretty(&envelope)?;
        if let Some(cipher) = &self.cipher {
            data = cipher.seal(&data)?;
        }
        write_atomic(&self.path_for(board), &data)
    }
}
