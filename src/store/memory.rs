//! In-memory stores for ttybbs.
//!
//! These back repositories that should not touch the disk (tests, demo
//! sessions) and record how often they were written.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{normalize_board_names, BoardListStore, PostStore};
use crate::board::Post;
use crate::Result;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Board list kept in memory.
#[derive(Debug, Default)]
pub struct MemoryBoardList {
    names: Mutex<Vec<String>>,
    saves: Mutex<usize>,
}

impl MemoryBoardList {
    /// Create an empty board list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board list holding `names`.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: Mutex::new(normalize_board_names(names)),
            saves: Mutex::new(0),
        }
    }

    /// Get the currently stored names.
    pub fn names(&self) -> Vec<String> {
        lock(&self.names).clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

impl BoardListStore for MemoryBoardList {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.names())
    }

    fn save(&self, names: &[String]) -> Result<()> {
        *lock(&self.names) = normalize_board_names(names);
        *lock(&self.saves) += 1;
        Ok(())
    }
}

/// Post lists kept in memory, keyed by board name.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    boards: Mutex<HashMap<String, Vec<Post>>>,
    saves: Mutex<usize>,
}

impl MemoryPostStore {
    /// Create an empty post store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the stored posts of a board, if it was ever saved.
    pub fn posts(&self, board: &str) -> Option<Vec<Post>> {
        lock(&self.boards).get(board).cloned()
    }

    /// Number of successful `save` calls across all boards.
    pub fn save_count(&self) -> usize {
        *lock(&self.saves)
    }
}

impl PostStore for MemoryPostStore {
    fn load(&self, board: &str) -> Result<Vec<Post>> {
        Ok(self.posts(board).unwrap_or_default())
    }

    fn save(&self, board: &str, posts: &[Post]) -> Result<()> {
        lock(&self.boards).insert(board.to_string(), posts.to_vec());
        *lock(&self.saves) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_memory_board_list() {
        let store = MemoryBoardList::with_names(["general", " tech", "general"]);
        assert_eq!(store.load().unwrap(), vec!["general", "tech"]);
        assert_eq!(store.save_count(), 0);

        store
            .save(&["general".to_string(), "retro".to_string()])
            .unwrap();

        assert_eq!(store.names(), vec!["general", "retro"]);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_memory_post_store() {
        let store = MemoryPostStore::new();
        assert!(store.load("general").unwrap().is_empty());
        assert!(store.posts("general").is_none());

        let post = Post {
            id: 1,
            title: "t".to_string(),
            content: String::new(),
            author: "a".to_string(),
            created_at: Utc::now(),
            comments: Vec::new(),
        };
        store.save("general", &[post.clone()]).unwrap();

        assert_eq!(store.load("general").unwrap(), vec![post]);
        assert_eq!(store.save_count(), 1);
    }
}
