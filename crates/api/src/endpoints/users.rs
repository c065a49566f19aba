//! Author feed and follow endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use quill_common::AppResult;
use quill_core::{FollowOutcome, UnfollowOutcome};
use serde::Serialize;

use crate::{
    endpoints::feeds::PageQuery,
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, AuthorFeedResponse, PostResponse},
};

/// Follow state change response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub status: &'static str,
}

/// Router for user endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{username}/posts", get(author_posts))
        .route("/{username}/follow", post(follow))
        .route("/{username}/unfollow", post(unfollow))
}

/// Posts by an author, with the author context and the viewer's follow
/// state.
async fn author_posts(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    let feed = state
        .feed_service
        .author_feed(&username, viewer_id, query.page)
        .await?;

    Ok(ApiResponse::ok(AuthorFeedResponse {
        author: feed.author.into(),
        is_following: feed.is_following,
        page: feed.page.map(PostResponse::from),
    }))
}

/// Follow an author.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.follow_service.follow(&user.id, &username).await?;

    let status = match outcome {
        FollowOutcome::Following => "following",
        FollowOutcome::AlreadyFollowing => "alreadyFollowing",
        FollowOutcome::SelfFollow => "selfFollow",
    };
    Ok(ApiResponse::ok(FollowResponse { status }))
}

/// Unfollow an author.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.follow_service.unfollow(&user.id, &username).await?;

    let status = match outcome {
        UnfollowOutcome::Unfollowed => "unfollowed",
        UnfollowOutcome::NotFollowing => "notFollowing",
    };
    Ok(ApiResponse::ok(FollowResponse { status }))
}
