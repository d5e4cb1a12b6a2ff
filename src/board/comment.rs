//! Comment operations on [`Bbs`].

use tracing::debug;

use super::registry::{read, write};
use super::repository::Bbs;
use super::types::Comment;
use crate::Result;

impl Bbs {
    /// Add a comment to a post.
    ///
    /// The comment ID is its 1-based position within the post. `parent_id`
    /// is kept as a display hint and is not checked against existing
    /// comments; 0 marks a top-level comment.
    pub fn add_comment(
        &self,
        board: &str,
        post_id: u64,
        author: &str,
        content: &str,
        parent_id: u64,
    ) -> Result<Comment> {
        let author = self.author_or_default(author);
        let handle = self.board(board)?;

        let mut state = write(&handle);
        let index = state.position(post_id)?;
        let comment = Comment {
            id: state.posts[index].comments.len() as u64 + 1,
            post_id,
            parent_id,
            author,
            content: content.trim().to_string(),
            created_at: self.now(),
        };

        let mut staged = state.posts.clone();
        staged[index].comments.push(comment.clone());
        self.save_posts(&state.name, &staged)?;

        state.posts = staged;
        debug!(
            board = %state.name,
            post_id,
            comment_id = comment.id,
            parent_id,
            "Comment added"
        );
        Ok(comment)
    }

    /// List the comments of a post in insertion order.
    pub fn list_comments(&self, board: &str, post_id: u64) -> Result<Vec<Comment>> {
        let handle = self.board(board)?;
        let state = read(&handle);
        let index = state.position(post_id)?;
        Ok(state.posts[index].comments.clone())
    }
}
