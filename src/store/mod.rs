//! Storage module for ttybbs.
//!
//! This module defines the persistence contracts the repository calls and
//! provides file-backed and in-memory implementations:
//! - Board list storage (ordered board names)
//! - Post storage (one post list per board, comments inline)
//! - Atomic temp-file-then-rename writes for the file-backed stores

mod atomic;
mod board_file;
mod memory;
mod post_file;

use std::collections::HashSet;

pub use board_file::BoardFile;
pub use memory::{MemoryBoardList, MemoryPostStore};
pub use post_file::{PostFile, POST_FILE_VERSION};

use crate::board::Post;
use crate::Result;

/// Persistence contract for the ordered list of board names.
pub trait BoardListStore: Send + Sync {
    /// Load the stored board names. Missing storage yields an empty list.
    fn load(&self) -> Result<Vec<String>>;

    /// Replace the stored board names.
    fn save(&self, names: &[String]) -> Result<()>;
}

/// Persistence contract for per-board post lists.
pub trait PostStore: Send + Sync {
    /// Load all posts of a board. A board never saved yields an empty list.
    fn load(&self, board: &str) -> Result<Vec<Post>>;

    /// Replace all posts of a board.
    fn save(&self, board: &str, posts: &[Post]) -> Result<()>;
}

/// Normalize board names for storage.
///
/// Trims each name, drops empty entries and keeps only the first occurrence
/// of duplicates. Order is preserved.
pub fn normalize_board_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() || !seen.insert(name.to_string()) {
            continue;
        }
        out.push(name.to_string());
    }
    out
}
