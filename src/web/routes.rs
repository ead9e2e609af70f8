use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::AppState;
use crate::auth::RequirePostScope;
use crate::db::{
    get_post, increment_comment_count, insert_comment, insert_post, list_comments, list_posts,
    NewComment, NewPost,
};
use crate::object_id::ObjectId;
use crate::sanitize::html_escape;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts_index))
        .route("/posts/new", post(create_post))
        .route("/posts/:id", get(post_detail))
        .route("/posts/:id/comments", get(comments_index))
        .route("/posts/:id/comments/new", post(create_comment))
        .route("/healthz", get(health))
}

/// Parse a path parameter into a store identifier, mapping any
/// malformed input to 400.
fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse(raw).ok_or_else(|| ApiError::BadRequest("invalid post id".to_string()))
}

/// Trim, require non-empty, and escape a text field from a request body.
fn require_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    let text = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if text.is_empty() {
        return Err(ApiError::BadRequest(format!("{field} is required")));
    }
    Ok(html_escape(&text))
}

// ========== Post Routes ==========

/// List all posts, newest first (GET /posts).
async fn posts_index(State(state): State<AppState>) -> Result<Response, ApiError> {
    let posts = list_posts(state.db.pool()).await?;
    Ok(Json(json!({ "posts": posts })).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    title: Option<String>,
    body: Option<String>,
}

/// Create a new post (POST /posts/new).
///
/// Gated by `RequirePostScope` when a token verifier is configured.
async fn create_post(
    State(state): State<AppState>,
    RequirePostScope(claims): RequirePostScope,
    Json(payload): Json<CreatePostBody>,
) -> Result<Response, ApiError> {
    let title = require_text(payload.title, "title")?;
    let body = require_text(payload.body, "body")?;

    let id = insert_post(state.db.pool(), &NewPost { title, body }).await?;

    match claims {
        Some(claims) => tracing::info!(post_id = %id, sub = %claims.sub, "Post created"),
        None => tracing::info!(post_id = %id, "Post created"),
    }

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
}

/// Fetch a single post (GET /posts/:id).
async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    match get_post(state.db.pool(), &id).await? {
        Some(post) => Ok(Json(post).into_response()),
        None => Err(ApiError::NotFound("post not found".to_string())),
    }
}

// ========== Comment Routes ==========

/// List comments for a post (GET /posts/:id/comments).
///
/// The parent post is not required to exist: a well-formed id with no
/// post yields an empty list, which saves the read path an existence
/// round trip.
async fn comments_index(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let comments = list_comments(state.db.pool(), &id).await?;
    Ok(Json(json!({ "comments": comments })).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    body: Option<String>,
}

/// Create a comment on a post (POST /posts/:id/comments/new).
async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateCommentBody>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;

    let post = get_post(state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("post not found".to_string()))?;

    let body = require_text(payload.body, "body")?;

    let comment_id = insert_comment(
        state.db.pool(),
        &NewComment {
            post_id: post.id,
            body,
        },
    )
    .await?;

    // Second, non-transactional write. If it fails the comment is already
    // durable and the counter drifts; we log and still return success.
    if let Err(e) = increment_comment_count(state.db.pool(), &id).await {
        tracing::warn!(post_id = %id, "Comment stored but counter update failed: {e:#}");
    }

    tracing::info!(post_id = %id, comment_id = %comment_id, "Comment created");

    Ok((StatusCode::CREATED, Json(json!({ "id": comment_id }))).into_response())
}

// ========== Misc ==========

async fn health() -> &'static str {
    "OK"
}
