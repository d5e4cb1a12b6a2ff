//! Board module for ttybbs.
//!
//! This module provides the bulletin board repository:
//! - Board listing and implicit board creation
//! - Post management with per-board sequential IDs
//! - Threaded comments stored inline on posts
//! - Two-level locking (board index, then per-board state)

mod comment;
mod registry;
mod repository;
mod types;

pub use repository::{Bbs, BbsOptions, Clock};
pub use types::{BoardSummary, Comment, Post, PostPage};
