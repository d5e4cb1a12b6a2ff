//! ttybbs - multi-board bulletin board core
//!
//! Boards, posts and threaded comments held in memory behind two-level
//! locks, persisted to JSON files that can be sealed with AES-256-GCM.
//! Session transports and terminal front ends call into [`Bbs`].

pub mod board;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod store;

pub use board::{Bbs, BbsOptions, BoardSummary, Clock, Comment, Post, PostPage};
pub use config::Config;
pub use crypto::PostCipher;
pub use error::{BbsError, Result};
pub use store::{BoardFile, BoardListStore, MemoryBoardList, MemoryPostStore, PostFile, PostStore};
