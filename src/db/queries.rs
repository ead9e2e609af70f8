use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::{Comment, NewComment, NewPost, Post};
use crate::object_id::ObjectId;

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

// ========== Posts ==========

/// List all posts, newest first.
pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<Post>> {
    sqlx::query_as("SELECT * FROM posts ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
        .context("Failed to list posts")
}

/// Get a post by its id.
pub async fn get_post(pool: &SqlitePool, id: &ObjectId) -> Result<Option<Post>> {
    sqlx::query_as("SELECT * FROM posts WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await
        .context("Failed to fetch post")
}

/// Insert a new post, returning its generated id.
pub async fn insert_post(pool: &SqlitePool, post: &NewPost) -> Result<ObjectId> {
    let id = ObjectId::generate();
    let now = now_rfc3339();

    sqlx::query(
        r"
        INSERT INTO posts (id, title, body, created_at, updated_at, num_comments)
        VALUES (?, ?, ?, ?, ?, 0)
        ",
    )
    .bind(id.as_str())
    .bind(&post.title)
    .bind(&post.body)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .context("Failed to insert post")?;

    Ok(id)
}

// ========== Comments ==========

/// List comments for a post, oldest first.
///
/// Does not require the post to exist; an unknown id yields an empty list.
pub async fn list_comments(pool: &SqlitePool, post_id: &ObjectId) -> Result<Vec<Comment>> {
    sqlx::query_as("SELECT * FROM comments WHERE post_id = ? ORDER BY created_at ASC, id ASC")
        .bind(post_id.as_str())
        .fetch_all(pool)
        .await
        .context("Failed to list comments")
}

/// Insert a new comment, returning its generated id.
pub async fn insert_comment(pool: &SqlitePool, comment: &NewComment) -> Result<ObjectId> {
    let id = ObjectId::generate();
    let now = now_rfc3339();

    sqlx::query(
        r"
        INSERT INTO comments (id, post_id, body, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(id.as_str())
    .bind(&comment.post_id)
    .bind(&comment.body)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .context("Failed to insert comment")?;

    Ok(id)
}

/// Atomically bump a post's denormalized comment counter.
///
/// A single in-place UPDATE, not a read-modify-write, so concurrent
/// bumps cannot lose increments that do run.
pub async fn increment_comment_count(pool: &SqlitePool, post_id: &ObjectId) -> Result<()> {
    sqlx::query("UPDATE posts SET num_comments = num_comments + 1 WHERE id = ?")
        .bind(post_id.as_str())
        .execute(pool)
        .await
        .context("Failed to increment comment count")?;

    Ok(())
}
