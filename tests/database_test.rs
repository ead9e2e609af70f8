//! Integration tests for database operations.

use miniblog::db::{
    get_post, increment_comment_count, insert_comment, insert_post, list_comments, list_posts,
    Database, NewComment, NewPost,
};
use miniblog::object_id::ObjectId;
use tempfile::TempDir;

async fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let db = Database::new(&db_path)
        .await
        .expect("Failed to create database");
    (db, temp_dir)
}

#[tokio::test]
async fn test_insert_and_get_post() {
    let (db, _temp_dir) = setup_db().await;

    let new_post = NewPost {
        title: "First post".to_string(),
        body: "Hello world".to_string(),
    };

    let id = insert_post(db.pool(), &new_post)
        .await
        .expect("Failed to insert post");

    let retrieved = get_post(db.pool(), &id)
        .await
        .expect("Failed to get post")
        .expect("Post not found");

    assert_eq!(retrieved.id, id.as_str());
    assert_eq!(retrieved.title, "First post");
    assert_eq!(retrieved.body, "Hello world");
    assert_eq!(retrieved.num_comments, 0);
    assert!(!retrieved.created_at.is_empty());
    assert_eq!(retrieved.created_at, retrieved.updated_at);
}

#[tokio::test]
async fn test_get_missing_post() {
    let (db, _temp_dir) = setup_db().await;

    let id = ObjectId::parse("5d273f9ed65273c3b0a2b552").expect("valid id");
    let result = get_post(db.pool(), &id).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn test_list_posts_newest_first() {
    let (db, _temp_dir) = setup_db().await;

    let first = insert_post(
        db.pool(),
        &NewPost {
            title: "older".to_string(),
            body: "a".to_string(),
        },
    )
    .await
    .unwrap();

    let second = insert_post(
        db.pool(),
        &NewPost {
            title: "newer".to_string(),
            body: "b".to_string(),
        },
    )
    .await
    .unwrap();

    let posts = list_posts(db.pool()).await.expect("Failed to list posts");
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, second.as_str());
    assert_eq!(posts[1].id, first.as_str());
}

#[tokio::test]
async fn test_comments_for_unknown_post_is_empty() {
    let (db, _temp_dir) = setup_db().await;

    let id = ObjectId::parse("5d273f9ed65273c3b0a2b552").expect("valid id");
    let comments = list_comments(db.pool(), &id).await.expect("Query failed");
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_insert_comment_and_increment_counter() {
    let (db, _temp_dir) = setup_db().await;

    let post_id = insert_post(
        db.pool(),
        &NewPost {
            title: "post".to_string(),
            body: "body".to_string(),
        },
    )
    .await
    .unwrap();

    let comment_id = insert_comment(
        db.pool(),
        &NewComment {
            post_id: post_id.as_str().to_string(),
            body: "nice post".to_string(),
        },
    )
    .await
    .expect("Failed to insert comment");

    increment_comment_count(db.pool(), &post_id)
        .await
        .expect("Failed to increment counter");

    let comments = list_comments(db.pool(), &post_id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, comment_id.as_str());
    assert_eq!(comments[0].post_id, post_id.as_str());
    assert_eq!(comments[0].body, "nice post");

    let post = get_post(db.pool(), &post_id).await.unwrap().unwrap();
    assert_eq!(post.num_comments, 1);
}

#[tokio::test]
async fn test_comments_ordered_oldest_first() {
    let (db, _temp_dir) = setup_db().await;

    let post_id = insert_post(
        db.pool(),
        &NewPost {
            title: "post".to_string(),
            body: "body".to_string(),
        },
    )
    .await
    .unwrap();

    let first = insert_comment(
        db.pool(),
        &NewComment {
            post_id: post_id.as_str().to_string(),
            body: "first".to_string(),
        },
    )
    .await
    .unwrap();

    let second = insert_comment(
        db.pool(),
        &NewComment {
            post_id: post_id.as_str().to_string(),
            body: "second".to_string(),
        },
    )
    .await
    .unwrap();

    let comments = list_comments(db.pool(), &post_id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].id, first.as_str());
    assert_eq!(comments[1].id, second.as_str());
}

#[tokio::test]
async fn test_increment_is_cumulative() {
    let (db, _temp_dir) = setup_db().await;

    let post_id = insert_post(
        db.pool(),
        &NewPost {
            title: "post".to_string(),
            body: "body".to_string(),
        },
    )
    .await
    .unwrap();

    for _ in 0..3 {
        increment_comment_count(db.pool(), &post_id).await.unwrap();
    }

    let post = get_post(db.pool(), &post_id).await.unwrap().unwrap();
    assert_eq!(post.num_comments, 3);
}
