//! Post and comment endpoints.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use quill_common::AppResult;
use quill_core::{CreateCommentInput, CreatePostInput, EditOutcome, UpdatePostInput};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, CommentResponse, PostDetailResponse, PostResponse},
};

/// Router for post endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_post))
        .route("/{id}", get(post_detail))
        .route("/{id}/edit", post(edit_post))
        .route("/{id}/comments", post(create_comment))
}

/// Create a post.
async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<impl IntoResponse> {
    let created = state.post_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(PostResponse::from(created)))
}

/// Post detail with comments, oldest first.
async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let detail = state.post_service.get_detail(&id).await?;

    Ok(ApiResponse::ok(PostDetailResponse {
        post: detail.post.into(),
        comments: detail.comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

/// Edit a post. Editors who are not the author are sent back to the
/// post's read-only view.
async fn edit_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<Response> {
    match state.post_service.update(&user.id, &id, input).await? {
        EditOutcome::Updated(updated) => {
            Ok(ApiResponse::ok(PostResponse::from(updated)).into_response())
        }
        EditOutcome::NotAuthor => Ok(Redirect::to(&format!("/posts/{id}")).into_response()),
    }
}

/// Add a comment to a post.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<impl IntoResponse> {
    let created = state.comment_service.create(&user.id, &id, input).await?;
    Ok(ApiResponse::ok(CommentResponse::from(created)))
}
