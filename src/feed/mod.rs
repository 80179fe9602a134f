// Mock social feed, the provider of comments for the moderation panel.
//
// Everything here resolves immediately against in-memory fixture data. New
// comments are built and returned but never stored, the same way the mock
// API behaves.

pub mod fixtures;
pub mod models;
pub mod search;

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use models::{Comment, Post, User};

/// Where the moderation panel gets its comments from.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// All comments on a post, in feed order.
    async fn post_comments(&self, post_id: &str) -> Result<Vec<Comment>>;

    /// Create a comment on a post as the current user.
    async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment>;
}

/// In-memory feed backed by the fixture users, posts and comments.
pub struct MockFeed {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    next_comment: AtomicU64,
}

impl Default for MockFeed {
    fn default() -> Self {
        let users = fixtures::users();
        let posts = fixtures::posts(&users);
        let comments = fixtures::comments(&users);
        Self {
            users,
            posts,
            comments,
            next_comment: AtomicU64::new(1),
        }
    }
}

impl MockFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in user. The mock always signs in as the first fixture user.
    pub fn current_user(&self) -> &User {
        &self.users[0]
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }
}

#[async_trait]
impl CommentSource for MockFeed {
    async fn post_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        debug!(post_id, count = comments.len(), "Fetched comments");
        Ok(comments)
    }

    async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment> {
        if self.post(post_id).is_none() {
            anyhow::bail!("Post not found: {post_id}");
        }

        let now = Utc::now();
        let seq = self.next_comment.fetch_add(1, Ordering::Relaxed);
        let author = self.current_user().clone();

        Ok(Comment {
            id: format!("new-comment-{}-{}", now.timestamp_millis(), seq),
            post_id: post_id.to_string(),
            user_id: author.id.clone(),
            author,
            content: content.to_string(),
            likes: 0,
            created_at: now,
            replies: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_comments_filters_by_post() {
        let feed = MockFeed::new();
        let comments = feed.post_comments("post1").await.unwrap();
        assert_eq!(comments.len(), 2);
        assert!(comments.iter().all(|c| c.post_id == "post1"));
    }

    #[tokio::test]
    async fn test_post_comments_unknown_post_is_empty() {
        let feed = MockFeed::new();
        assert!(feed.post_comments("post99").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_comment_uses_current_user_and_unique_ids() {
        let feed = MockFeed::new();
        let a = feed.add_comment("post1", "first").await.unwrap();
        let b = feed.add_comment("post1", "second").await.unwrap();

        assert_eq!(a.author.username, "cosmicwanderer");
        assert_eq!(a.likes, 0);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("new-comment-"));
    }

    #[tokio::test]
    async fn test_add_comment_does_not_persist() {
        let feed = MockFeed::new();
        feed.add_comment("post1", "hello").await.unwrap();
        assert_eq!(feed.post_comments("post1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_add_comment_unknown_post_fails() {
        let feed = MockFeed::new();
        assert!(feed.add_comment("nope", "hello").await.is_err());
    }
}
