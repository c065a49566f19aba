//! Group feed endpoints.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use quill_common::AppResult;

use crate::{
    endpoints::feeds::PageQuery,
    middleware::AppState,
    response::{ApiResponse, GroupFeedResponse, PostResponse},
};

/// Router for group endpoints.
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}/posts", get(group_posts))
}

/// Posts published into a group, with the group context.
async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let feed = state.feed_service.group_feed(&slug, query.page).await?;

    Ok(ApiResponse::ok(GroupFeedResponse {
        group: feed.group.into(),
        page: feed.page.map(PostResponse::from),
    }))
}
