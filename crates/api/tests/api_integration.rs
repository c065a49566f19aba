//! API integration tests.
//!
//! These tests drive the router end to end over a scripted mock
//! database and an in-process feed cache.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use maplit::btreemap;
use quill_api::{auth_middleware, middleware::AppState, router as api_router};
use quill_common::IdGenerator;
use quill_core::{
    CommentService, FeedService, FollowService, MemoryFeedCache, PostService, UserService,
};
use quill_db::entities::{post, user};
use quill_db::repositories::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use sea_orm::{DatabaseConnection, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

fn test_user(id: &str, username: &str, token: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        username_lower: username.to_lowercase(),
        name: None,
        bio: None,
        token: Some(token.to_string()),
        created_at: Utc::now().into(),
    }
}

fn test_post(id: &str, author_id: &str, text: &str) -> post::Model {
    post::Model {
        id: id.to_string(),
        author_id: author_id.to_string(),
        group_id: None,
        text: text.to_string(),
        image_url: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    btreemap! { "num_items" => Into::<Value>::into(n) }
}

/// Build app state over a scripted connection, sharing `cache` across
/// requests.
fn create_state(db: DatabaseConnection, cache: Arc<MemoryFeedCache>) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));

    AppState {
        user_service: UserService::new(user_repo.clone()),
        feed_service: FeedService::new(
            post_repo.clone(),
            group_repo.clone(),
            user_repo.clone(),
            follow_repo.clone(),
            10,
        ),
        post_service: PostService::new(
            post_repo.clone(),
            group_repo,
            comment_repo.clone(),
            IdGenerator::new(),
        ),
        comment_service: CommentService::new(comment_repo, post_repo, IdGenerator::new()),
        follow_service: FollowService::new(follow_repo, user_repo, IdGenerator::new()),
        feed_cache: cache,
    }
}

fn create_router(state: AppState) -> Router {
    api_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_index_feed_returns_page() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![test_post("p1", "user1", "hello")]])
        .into_connection();
    let app = create_router(create_state(db, Arc::new(MemoryFeedCache::new(20))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/feed?page=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains(r#""totalItems":1"#));
    assert!(body.contains("hello"));
}

#[tokio::test]
async fn test_index_feed_non_numeric_page_serves_first_page() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![test_post("p1", "user1", "hello")]])
        .into_connection();
    let app = create_router(create_state(db, Arc::new(MemoryFeedCache::new(20))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/feed?page=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains(r#""number":1"#));
    assert!(body.contains("hello"));
}

#[tokio::test]
async fn test_index_feed_cache_serves_stored_bytes_until_cleared() {
    // Script covers, in order: first render (count + slice), the token
    // lookup for the clear call, and the post-clear render. The cached
    // second read issues no queries.
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![test_post("p1", "user1", "first render")]])
        .append_query_results([vec![test_user("user1", "vasya", "secret")]])
        .append_query_results([vec![count_row(0)]])
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let cache = Arc::new(MemoryFeedCache::new(20));
    let state = create_state(db, cache);

    let first = create_router(state.clone())
        .oneshot(Request::builder().uri("/feed").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_bytes(first).await;

    // Within the TTL the stored bytes come back verbatim, no database
    // traffic.
    let second = create_router(state.clone())
        .oneshot(Request::builder().uri("/feed").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_bytes(second).await, first_body);

    let clear = create_router(state.clone())
        .oneshot(
            Request::builder()
                .uri("/feed/cache/clear")
                .method("POST")
                .header("Authorization", "Bearer secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(clear.status(), StatusCode::OK);

    // Cleared slot forces a re-render from current data.
    let third = create_router(state)
        .oneshot(Request::builder().uri("/feed").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::OK);
    let third_body = String::from_utf8(body_bytes(third).await).unwrap();
    assert!(third_body.contains(r#""totalItems":0"#));
}

#[tokio::test]
async fn test_following_feed_redirects_anonymous_to_login() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
    let app = create_router(create_state(db, Arc::new(MemoryFeedCache::new(20))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/feed/following")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert_eq!(location, "/auth/login?next=/feed/following");
}

#[tokio::test]
async fn test_self_follow_reports_outcome_without_creating_edge() {
    // Token lookup, then username lookup. No edge queries scripted; an
    // insert attempt would exhaust the mock.
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("user1", "vasya", "secret")]])
        .append_query_results([vec![test_user("user1", "vasya", "secret")]])
        .into_connection();
    let app = create_router(create_state(db, Arc::new(MemoryFeedCache::new(20))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/vasya/follow")
                .method("POST")
                .header("Authorization", "Bearer secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("selfFollow"));
}

#[tokio::test]
async fn test_edit_by_non_author_redirects_to_post() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("user2", "leo", "secret2")]])
        .append_query_results([vec![test_post("p1", "user1", "original")]])
        .into_connection();
    let app = create_router(create_state(db, Arc::new(MemoryFeedCache::new(20))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/p1/edit")
                .method("POST")
                .header("Authorization", "Bearer secret2")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"text":"hijacked"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert_eq!(location, "/posts/p1");
}

#[tokio::test]
async fn test_group_feed_unknown_slug_returns_404() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_query_results([Vec::<quill_db::entities::group::Model>::new()])
        .into_connection();
    let app = create_router(create_state(db, Arc::new(MemoryFeedCache::new(20))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/groups/missing/posts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
    let app = create_router(create_state(db, Arc::new(MemoryFeedCache::new(20))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
