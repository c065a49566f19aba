//! Follow relationship management.
//!
//! Both directions are idempotent: following twice or unfollowing an
//! author you never followed leaves the edge set unchanged. Attempting
//! to follow yourself is a silent no-op rather than an error.

use quill_common::{AppResult, IdGenerator};
use quill_db::{
    entities::follow,
    repositories::{FollowRepository, UserRepository},
};
use sea_orm::Set;

/// Result of a follow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new follow edge was created.
    Following,
    /// The edge already existed; nothing changed.
    AlreadyFollowing,
    /// The viewer tried to follow themselves; nothing changed.
    SelfFollow,
}

/// Result of an unfollow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    /// The edge was removed.
    Unfollowed,
    /// No edge existed; nothing changed.
    NotFollowing,
}

#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    #[must_use]
    pub const fn new(
        follow_repo: FollowRepository,
        user_repo: UserRepository,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            follow_repo,
            user_repo,
            id_gen,
        }
    }

    /// Follow the author behind `author_username` on behalf of
    /// `follower_id`. Fails with `UserNotFound` if the username does not
    /// resolve.
    pub async fn follow(
        &self,
        follower_id: &str,
        author_username: &str,
    ) -> AppResult<FollowOutcome> {
        let author = self.user_repo.get_by_username(author_username).await?;

        if author.id == follower_id {
            tracing::debug!(user_id = %follower_id, "ignoring self-follow request");
            return Ok(FollowOutcome::SelfFollow);
        }

        if self.follow_repo.is_following(follower_id, &author.id).await? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        let edge = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower_id.to_string()),
            author_id: Set(author.id.clone()),
            ..Default::default()
        };
        self.follow_repo.create(edge).await?;

        tracing::info!(follower_id = %follower_id, author_id = %author.id, "follow created");
        Ok(FollowOutcome::Following)
    }

    /// Remove the follow edge towards `author_username`, if present.
    pub async fn unfollow(
        &self,
        follower_id: &str,
        author_username: &str,
    ) -> AppResult<UnfollowOutcome> {
        let author = self.user_repo.get_by_username(author_username).await?;

        if self.follow_repo.delete_by_pair(follower_id, &author.id).await? {
            tracing::info!(follower_id = %follower_id, author_id = %author.id, "follow removed");
            Ok(UnfollowOutcome::Unfollowed)
        } else {
            Ok(UnfollowOutcome::NotFollowing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quill_common::AppError;
    use quill_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            name: None,
            bio: None,
            token: None,
            created_at: Utc::now().into(),
        }
    }

    fn edge(id: &str, follower_id: &str, author_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            author_id: author_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> FollowService {
        FollowService::new(
            FollowRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
            IdGenerator::new(),
        )
    }

    #[tokio::test]
    async fn test_follow_creates_edge() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_user("user2", "leo")]])
                .append_query_results([Vec::<follow::Model>::new()])
                .append_query_results([vec![edge("f1", "user1", "user2")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(db);
        let outcome = service.follow("user1", "leo").await.unwrap();

        assert_eq!(outcome, FollowOutcome::Following);
    }

    #[tokio::test]
    async fn test_follow_is_idempotent() {
        // Only the user lookup and the existence check are scripted; an
        // insert would exhaust the mock.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_user("user2", "leo")]])
                .append_query_results([vec![edge("f1", "user1", "user2")]])
                .into_connection(),
        );

        let service = service_with(db);
        let outcome = service.follow("user1", "leo").await.unwrap();

        assert_eq!(outcome, FollowOutcome::AlreadyFollowing);
    }

    #[tokio::test]
    async fn test_self_follow_is_silently_ignored() {
        // Only the user lookup is scripted; any edge query or insert
        // would exhaust the mock.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_user("user1", "vasya")]])
                .into_connection(),
        );

        let service = service_with(db);
        let outcome = service.follow("user1", "vasya").await.unwrap();

        assert_eq!(outcome, FollowOutcome::SelfFollow);
    }

    #[tokio::test]
    async fn test_follow_unknown_author() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.follow("user1", "ghost").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_unfollow_removes_edge() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_user("user2", "leo")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(db);
        let outcome = service.unfollow("user1", "leo").await.unwrap();

        assert_eq!(outcome, UnfollowOutcome::Unfollowed);
    }

    #[tokio::test]
    async fn test_unfollow_without_edge_is_a_no_op() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![create_test_user("user2", "leo")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = service_with(db);
        let outcome = service.unfollow("user1", "leo").await.unwrap();

        assert_eq!(outcome, UnfollowOutcome::NotFollowing);
    }
}
