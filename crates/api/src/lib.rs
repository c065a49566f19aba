//! HTTP API layer for quill.
//!
//! This crate provides the REST surface over the feed, follow, post and
//! comment services:
//!
//! - **Endpoints**: feed reads, post/comment writes, follow state
//! - **Extractors**: bearer-token authentication with login redirects
//! - **Middleware**: token resolution, shared application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{auth_middleware, AppState};
