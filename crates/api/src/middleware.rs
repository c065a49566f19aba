//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use quill_core::{
    CommentService, FeedCacheService, FeedService, FollowService, PostService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub feed_service: FeedService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub follow_service: FollowService,
    pub feed_cache: FeedCacheService,
}

/// Authentication middleware.
///
/// Resolves a bearer token to a user and stores the model in request
/// extensions for the `AuthUser`/`MaybeAuthUser` extractors. Requests
/// without a valid token pass through anonymously.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(Some(user)) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
