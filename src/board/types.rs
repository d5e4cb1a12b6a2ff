//! Board, post and comment models for ttybbs.
//!
//! JSON keys follow the established on-disk layout of post files, so files
//! written by earlier deployments load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Post entity representing a titled message in a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post ID, unique within its board.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Post title (trimmed, never empty).
    #[serde(rename = "Title")]
    pub title: String,
    /// Post body (trimmed, may be empty).
    #[serde(rename = "Content")]
    pub content: String,
    /// Author name.
    #[serde(rename = "Author")]
    pub author: String,
    /// Post creation timestamp.
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    /// Comments in insertion order.
    #[serde(rename = "Comments", default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
}

/// Read a list that older writers emit as `null` when empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Post {
    /// Check if the post was written by the given author.
    ///
    /// The repository does not enforce ownership; policy layers use this
    /// before calling delete.
    pub fn is_authored_by(&self, author: &str) -> bool {
        self.author == author.trim()
    }

    /// Number of comments on this post.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// Comment entity representing a reply to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID, the 1-based position within its post.
    #[serde(rename = "ID")]
    pub id: u64,
    /// ID of the post this comment belongs to.
    #[serde(rename = "PostID")]
    pub post_id: u64,
    /// ID of the comment this one replies to (0 for top-level).
    #[serde(rename = "ParentID")]
    pub parent_id: u64,
    /// Author name.
    #[serde(rename = "Author")]
    pub author: String,
    /// Comment body.
    #[serde(rename = "Content")]
    pub content: String,
    /// Comment creation timestamp.
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Check if this comment replies directly to the post.
    pub fn is_top_level(&self) -> bool {
        self.parent_id == 0
    }
}

/// Board name and post count, as shown in the board list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSummary {
    /// Board name.
    pub name: String,
    /// Number of posts currently on the board.
    pub post_count: usize,
}

/// One page of a board's posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    /// Posts on this page, in ID order.
    pub posts: Vec<Post>,
    /// 0-based page index that was requested.
    pub page: usize,
    /// Total number of pages (0 for an empty board).
    pub total_pages: usize,
    /// Total number of posts on the board.
    pub total_posts: usize,
}

impl PostPage {
    /// Slice `posts` into the requested page.
    pub(crate) fn from_posts(posts: &[Post], page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_posts = posts.len();
        let total_pages = total_posts.div_ceil(per_page);
        let start = page.saturating_mul(per_page).min(total_posts);
        let end = start.saturating_add(per_page).min(total_posts);

        Self {
            posts: posts[start..end].to_vec(),
            page,
            total_pages,
            total_posts,
        }
    }
}
