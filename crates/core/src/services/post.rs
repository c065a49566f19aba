//! Post authoring service.

use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::{
    entities::{comment, post},
    repositories::{CommentRepository, GroupRepository, PostRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 10000, message = "text must be 1-10000 characters"))]
    pub text: String,

    /// Optional group to publish into, by id.
    pub group_id: Option<String>,

    /// Optional URL of an attached image.
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Input for editing a post. Edits resubmit the full form, so every field
/// replaces its stored value; omitting `group_id` detaches the post from
/// its group.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 10000, message = "text must be 1-10000 characters"))]
    pub text: String,

    pub group_id: Option<String>,

    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Result of an edit request.
pub enum EditOutcome {
    /// The post was updated.
    Updated(post::Model),
    /// The requester is not the post's author; nothing changed.
    NotAuthor,
}

/// A post together with its comments, oldest first.
pub struct PostDetail {
    pub post: post::Model,
    pub comments: Vec<comment::Model>,
}

#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    group_repo: GroupRepository,
    comment_repo: CommentRepository,
    id_gen: IdGenerator,
}

impl PostService {
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        group_repo: GroupRepository,
        comment_repo: CommentRepository,
        id_gen: IdGenerator,
    ) -> Self {
        Self {
            post_repo,
            group_repo,
            comment_repo,
            id_gen,
        }
    }

    /// Create a post authored by `author_id`. Fails with `GroupNotFound` if
    /// a group id is given that does not resolve.
    pub async fn create(&self, author_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        if let Some(group_id) = &input.group_id {
            self.group_repo.get_by_id(group_id).await?;
        }

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author_id.to_string()),
            group_id: Set(input.group_id),
            text: Set(input.text),
            image_url: Set(input.image_url),
            ..Default::default()
        };
        let created = self.post_repo.create(model).await?;

        tracing::info!(post_id = %created.id, author_id = %author_id, "post created");
        Ok(created)
    }

    /// Edit a post. Only the author may edit; anyone else gets
    /// [`EditOutcome::NotAuthor`] with the post left untouched.
    pub async fn update(
        &self,
        editor_id: &str,
        post_id: &str,
        input: UpdatePostInput,
    ) -> AppResult<EditOutcome> {
        input.validate()?;

        let existing = self.post_repo.get_by_id(post_id).await?;
        if existing.author_id != editor_id {
            tracing::debug!(post_id = %post_id, editor_id = %editor_id, "edit denied, not the author");
            return Ok(EditOutcome::NotAuthor);
        }

        if let Some(group_id) = &input.group_id {
            self.group_repo.get_by_id(group_id).await?;
        }

        let model = post::ActiveModel {
            id: Set(existing.id),
            text: Set(input.text),
            group_id: Set(input.group_id),
            image_url: Set(input.image_url),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };
        let updated = self.post_repo.update(model).await?;

        tracing::info!(post_id = %updated.id, "post updated");
        Ok(EditOutcome::Updated(updated))
    }

    /// Get a post with its comments. Fails with `PostNotFound`.
    pub async fn get_detail(&self, post_id: &str) -> AppResult<PostDetail> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let comments = self.comment_repo.find_by_post(post_id).await?;

        Ok(PostDetail { post, comments })
    }
}

impl std::fmt::Debug for EditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Updated(post) => f.debug_tuple("Updated").field(&post.id).finish(),
            Self::NotAuthor => f.write_str("NotAuthor"),
        }
    }
}
