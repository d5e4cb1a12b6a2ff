//! Board repository for ttybbs.
//!
//! [`Bbs`] is the in-memory source of truth for boards and posts. Every
//! mutation is staged, written through the configured stores, and swapped
//! into memory only after the write succeeds.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::registry::{read, write, Handle, Registry};
use super::types::{BoardSummary, Post, PostPage};
use crate::config::BbsConfig;
use crate::store::{
    normalize_board_names, BoardListStore, MemoryBoardList, MemoryPostStore, PostStore,
};
use crate::{BbsError, Result};

/// Timestamp source for new posts and comments.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Construction-time settings for a [`Bbs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BbsOptions {
    /// Boards created when the board list store is empty.
    pub default_boards: Vec<String>,
    /// Board used when a post names no board.
    pub fallback_board: String,
    /// Author recorded when none is given.
    pub default_author: String,
    /// Page size for [`Bbs::list_posts_page`].
    pub posts_per_page: usize,
}

impl Default for BbsOptions {
    fn default() -> Self {
        Self::from(&BbsConfig::default())
    }
}

impl From<&BbsConfig> for BbsOptions {
    fn from(config: &BbsConfig) -> Self {
        Self {
            default_boards: config.default_boards.clone(),
            fallback_board: config.fallback_board.clone(),
            default_author: config.default_author.clone(),
            posts_per_page: config.posts_per_page,
        }
    }
}

/// Posts of one board plus its ID counter.
pub(crate) struct BoardState {
    pub(crate) name: String,
    pub(crate) posts: Vec<Post>,
    pub(crate) next_id: u64,
}

impl BoardState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            posts: Vec::new(),
            next_id: 1,
        }
    }

    fn with_posts(name: &str, posts: Vec<Post>) -> Result<Self> {
        let next_id = posts
            .iter()
            .map(|p| p.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| BbsError::IdsExhausted(name.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            posts,
            next_id,
        })
    }

    pub(crate) fn position(&self, id: u64) -> Result<usize> {
        self.posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| BbsError::PostNotFound {
                board: self.name.clone(),
                id,
            })
    }
}

/// Multi-board message repository.
///
/// Safe to share between threads. All operations are synchronous and
/// return once the change is durable in the configured stores.
pub struct Bbs {
    boards: Registry<BoardState>,
    options: BbsOptions,
    clock: Clock,
    board_store: Arc<dyn BoardListStore>,
    post_store: Arc<dyn PostStore>,
}

impl Bbs {
    /// Open a repository over the given stores.
    ///
    /// Loads the board list (falling back to the configured defaults when it
    /// is empty) and every board's posts. Fails if any store read fails.
    pub fn open(
        options: BbsOptions,
        board_store: Arc<dyn BoardListStore>,
        post_store: Arc<dyn PostStore>,
    ) -> Result<Self> {
        let stored = board_store
            .load()
            .map_err(|e| BbsError::persist("load board list", e))?;
        let mut names = normalize_board_names(stored);
        if names.is_empty() {
            names = normalize_board_names(&options.default_boards);
        }
        if names.is_empty() {
            names = normalize_board_names([&options.fallback_board]);
        }

        let mut entries = Vec::with_capacity(names.len());
        let mut total_posts = 0;
        for name in names {
            let state = post_store
                .load(&name)
                .and_then(|posts| BoardState::with_posts(&name, posts))
                .map_err(|e| BbsError::persist(format!("load posts for board {name}"), e))?;
            total_posts += state.posts.len();
            entries.push((name, state));
        }

        let boards = Registry::new(entries);
        info!(boards = boards.len(), posts = total_posts, "Repository opened");

        Ok(Self {
            boards,
            options,
            clock: Arc::new(Utc::now),
            board_store,
            post_store,
        })
    }

    /// Create a repository backed by in-memory stores with default options.
    pub fn in_memory() -> Self {
        Self::open_in_memory(BbsOptions::default())
    }

    /// Create a repository backed by fresh in-memory stores.
    pub fn open_in_memory(options: BbsOptions) -> Self {
        let boards = normalize_board_names(&options.default_boards);
        let boards = if boards.is_empty() {
            normalize_board_names([&options.fallback_board])
        } else {
            boards
        };
        let entries = boards
            .into_iter()
            .map(|name| {
                let state = BoardState::new(&name);
                (name, state)
            })
            .collect::<Vec<_>>();

        Self {
            boards: Registry::new(entries),
            options,
            clock: Arc::new(Utc::now),
            board_store: Arc::new(MemoryBoardList::new()),
            post_store: Arc::new(MemoryPostStore::new()),
        }
    }

    /// Replace the timestamp source.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Get the options this repository was built with.
    pub fn options(&self) -> &BbsOptions {
        &self.options
    }

    /// Board names in listing order.
    pub fn board_names(&self) -> Vec<String> {
        self.boards.names()
    }

    /// List boards with their post counts, in creation order.
    pub fn list_boards(&self) -> Vec<BoardSummary> {
        self.boards
            .snapshot()
            .into_iter()
            .map(|(name, handle)| BoardSummary {
                name,
                post_count: read(&handle).posts.len(),
            })
            .collect()
    }

    /// List all posts of a board, in ID order.
    pub fn list_posts(&self, board: &str) -> Result<Vec<Post>> {
        let handle = self.board(board)?;
        let state = read(&handle);
        Ok(state.posts.clone())
    }

    /// List one page of a board's posts (0-based).
    pub fn list_posts_page(&self, board: &str, page: usize) -> Result<PostPage> {
        let handle = self.board(board)?;
        let state = read(&handle);
        Ok(PostPage::from_posts(
            &state.posts,
            page,
            self.options.posts_per_page,
        ))
    }

    /// Get a single post.
    pub fn get_post(&self, board: &str, id: u64) -> Result<Post> {
        let handle = self.board(board)?;
        let state = read(&handle);
        let index = state.position(id)?;
        Ok(state.posts[index].clone())
    }

    /// Add a post, creating the board if it does not exist.
    ///
    /// A blank board name selects the fallback board and an empty author is
    /// recorded as the default author.
    pub fn add_post(&self, board: &str, author: &str, title: &str, content: &str) -> Result<Post> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BbsError::EmptyTitle);
        }
        let author = self.author_or_default(author);
        let handle = self.ensure_board(board)?;

        let mut state = write(&handle);
        let next_id = state
            .next_id
            .checked_add(1)
            .ok_or_else(|| BbsError::IdsExhausted(state.name.clone()))?;
        let post = Post {
            id: state.next_id,
            title: title.to_string(),
            content: content.trim().to_string(),
            author,
            created_at: (self.clock)(),
            comments: Vec::new(),
        };

        let mut staged = state.posts.clone();
        staged.push(post.clone());
        self.save_posts(&state.name, &staged)?;

        state.posts = staged;
        state.next_id = next_id;
        debug!(board = %state.name, post_id = post.id, author = %post.author, "Post added");
        Ok(post)
    }

    /// Delete a post and return it.
    ///
    /// `requested_by` is recorded for tracing only; ownership checks belong
    /// to the caller (see [`Post::is_authored_by`]).
    pub fn delete_post(&self, board: &str, id: u64, requested_by: &str) -> Result<Post> {
        let handle = self.board(board)?;

        let mut state = write(&handle);
        let index = state.position(id)?;
        let mut staged = state.posts.clone();
        let removed = staged.remove(index);
        self.save_posts(&state.name, &staged)?;

        state.posts = staged;
        debug!(board = %state.name, post_id = id, requested_by, "Post deleted");
        Ok(removed)
    }

    /// Resolve an existing board.
    pub(crate) fn board(&self, name: &str) -> Result<Handle<BoardState>> {
        self.boards
            .get(name)
            .ok_or_else(|| BbsError::BoardNotFound(name.to_string()))
    }

    /// Resolve a board, creating and persisting it if missing.
    fn ensure_board(&self, name: &str) -> Result<Handle<BoardState>> {
        let name = match name.trim() {
            "" => self.options.fallback_board.trim(),
            trimmed => trimmed,
        };
        if name.is_empty() {
            return Err(BbsError::Config(
                "no board name given and no fallback board configured".to_string(),
            ));
        }
        if let Some(handle) = self.boards.get(name) {
            return Ok(handle);
        }

        let (handle, created) = self.boards.get_or_insert_with(
            name,
            |names| {
                self.board_store
                    .save(names)
                    .map_err(|e| BbsError::persist(format!("save board list adding {name}"), e))
            },
            || BoardState::new(name),
        )?;
        if created {
            info!(board = name, "Board created");
        }
        Ok(handle)
    }

    pub(crate) fn author_or_default(&self, author: &str) -> String {
        match author.trim() {
            "" => self.options.default_author.clone(),
            trimmed => trimmed.to_string(),
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub(crate) fn save_posts(&self, board: &str, posts: &[Post]) -> Result<()> {
        self.post_store
            .save(board, posts)
            .map_err(|e| BbsError::persist(format!("save posts for board {board}"), e))
    }
}

impl fmt::Debug for Bbs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bbs")
            .field("boards", &self.boards.names())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
