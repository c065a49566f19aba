//! Feed endpoints.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use quill_common::{AppError, AppResult};
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, PostResponse},
};

/// Page selection query.
///
/// A `page` value that does not parse as a number is treated the same
/// as an absent one, so the request falls back to the first page
/// instead of being rejected.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<u64>,
}

fn lenient_page<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Router for feed endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index_feed))
        .route("/cache/clear", post(clear_cache))
        .route("/following", get(following_feed))
}

/// Global feed.
///
/// The canonical rendering (no explicit page parameter) is served
/// through the single-slot response cache: a hit within the TTL returns
/// the stored bytes verbatim, a miss renders from the database, stores
/// the bytes and returns them. Explicit page requests always render.
async fn index_feed(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Response> {
    let cacheable = query.page.is_none();

    if cacheable && let Some(bytes) = state.feed_cache.get().await? {
        return Ok(json_response(bytes));
    }

    let page = state.feed_service.global_feed(query.page).await?;
    let body = ApiResponse::ok(page.map(PostResponse::from));
    let bytes =
        serde_json::to_vec(&body).map_err(|e| AppError::Internal(e.to_string()))?;

    if cacheable {
        state.feed_cache.set(&bytes).await?;
    }

    Ok(json_response(bytes))
}

/// Drop the cached index rendering immediately.
async fn clear_cache(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.feed_cache.clear().await?;
    Ok(ApiResponse::ok(()))
}

/// Posts by the authors the requester follows.
async fn following_feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let page = state.feed_service.following_feed(&user.id, query.page).await?;
    Ok(ApiResponse::ok(page.map(PostResponse::from)))
}

fn json_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], bytes).into_response()
}
