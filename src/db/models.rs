use serde::{Deserialize, Serialize};

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
    /// Denormalized count of comments referencing this post. Best-effort:
    /// may undercount if a counter bump fails after a comment insert.
    pub num_comments: i64,
}

/// A comment attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for inserting a new post. Text fields are expected to already
/// be escaped by the caller.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

/// Data for inserting a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: String,
    pub body: String,
}
