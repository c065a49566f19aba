//! Comment service.

use quill_common::{AppResult, IdGenerator};
use quill_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for commenting on a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 2000, message = "text must be 1-2000 characters"))]
    pub text: String,
}

#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen,
        }
    }

    /// Add a comment to a post. Fails with `PostNotFound` if the post
    /// does not exist.
    pub async fn create(
        &self,
        author_id: &str,
        post_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id),
            author_id: Set(author_id.to_string()),
            text: Set(input.text),
            ..Default::default()
        };
        let created = self.comment_repo.create(model).await?;

        tracing::info!(comment_id = %created.id, post_id = %post_id, "comment created");
        Ok(created)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quill_common::AppError;
    use quill_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> CommentService {
        CommentService::new(
            CommentRepository::new(Arc::clone(&db)),
            PostRepository::new(db),
            IdGenerator::new(),
        )
    }

    #[tokio::test]
    async fn test_create_comment() {
        let post = post::Model {
            id: "p1".to_string(),
            author_id: "user1".to_string(),
            group_id: None,
            text: "hello".to_string(),
            image_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let comment = comment::Model {
            id: "c1".to_string(),
            post_id: "p1".to_string(),
            author_id: "user2".to_string(),
            text: "nice".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![post]])
                .append_query_results([vec![comment]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(db);
        let created = service
            .create(
                "user2",
                "p1",
                CreateCommentInput {
                    text: "nice".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.post_id, "p1");
    }

    #[tokio::test]
    async fn test_create_comment_on_missing_post() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .create(
                "user2",
                "missing",
                CreateCommentInput {
                    text: "nice".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_comment_rejects_empty_text() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let result = service
            .create("user2", "p1", CreateCommentInput { text: String::new() })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
