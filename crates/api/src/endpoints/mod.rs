//! API endpoints.

mod feeds;
mod groups;
mod posts;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/feed", feeds::router())
        .nest("/groups", groups::router())
        .nest("/posts", posts::router())
        .nest("/users", users::router())
}
