//! Feed query service.
//!
//! Builds ordered, paginated views over posts. Every feed variant applies
//! the same ordering (creation timestamp descending, ties in insertion
//! order) before pagination; the ordering itself lives in the post
//! repository so the variants cannot drift apart.

use crate::services::pagination::{Page, Paginator};
use quill_common::AppResult;
use quill_db::{
    entities::{group, post, user},
    repositories::{FollowRepository, GroupRepository, PostRepository, UserRepository},
};

/// Feed service for read-only post listings.
#[derive(Clone)]
pub struct FeedService {
    post_repo: PostRepository,
    group_repo: GroupRepository,
    user_repo: UserRepository,
    follow_repo: FollowRepository,
    paginator: Paginator,
}

/// A group feed page with its group context.
pub struct GroupFeed {
    pub group: group::Model,
    pub page: Page<post::Model>,
}

/// An author feed page with its author context.
pub struct AuthorFeed {
    pub author: user::Model,
    /// Whether the requesting viewer follows this author. Always false for
    /// anonymous viewers and for authors viewing themselves.
    pub is_following: bool,
    pub page: Page<post::Model>,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        group_repo: GroupRepository,
        user_repo: UserRepository,
        follow_repo: FollowRepository,
        page_size: u64,
    ) -> Self {
        Self {
            post_repo,
            group_repo,
            user_repo,
            follow_repo,
            paginator: Paginator::new(page_size),
        }
    }

    /// Get a page of the global feed (all posts).
    pub async fn global_feed(&self, page: Option<u64>) -> AppResult<Page<post::Model>> {
        let total = self.post_repo.count_all().await?;
        let bounds = self.paginator.paginate(total, page);
        let posts = self.post_repo.find_all(bounds.limit, bounds.offset).await?;
        Ok(Page::new(posts, bounds))
    }

    /// Get a page of a group's feed. Fails with `GroupNotFound` if the slug
    /// does not resolve.
    pub async fn group_feed(&self, slug: &str, page: Option<u64>) -> AppResult<GroupFeed> {
        let group = self.group_repo.get_by_slug(slug).await?;
        let total = self.post_repo.count_by_group(&group.id).await?;
        let bounds = self.paginator.paginate(total, page);
        let posts = self
            .post_repo
            .find_by_group(&group.id, bounds.limit, bounds.offset)
            .await?;

        Ok(GroupFeed {
            group,
            page: Page::new(posts, bounds),
        })
    }

    /// Get a page of an author's feed. Fails with `UserNotFound` if the
    /// username does not resolve.
    pub async fn author_feed(
        &self,
        username: &str,
        viewer_id: Option<&str>,
        page: Option<u64>,
    ) -> AppResult<AuthorFeed> {
        let author = self.user_repo.get_by_username(username).await?;

        // Self-follow edges never exist, so viewing your own profile is
        // always "not following" without a query.
        let is_following = match viewer_id {
            Some(viewer) if viewer != author.id => {
                self.follow_repo.is_following(viewer, &author.id).await?
            }
            _ => false,
        };

        let total = self.post_repo.count_by_author(&author.id).await?;
        let bounds = self.paginator.paginate(total, page);
        let posts = self
            .post_repo
            .find_by_author(&author.id, bounds.limit, bounds.offset)
            .await?;

        Ok(AuthorFeed {
            author,
            is_following,
            page: Page::new(posts, bounds),
        })
    }

    /// Get a page of the followed-authors feed for a viewer.
    pub async fn following_feed(
        &self,
        viewer_id: &str,
        page: Option<u64>,
    ) -> AppResult<Page<post::Model>> {
        let author_ids = self.follow_repo.find_followed_author_ids(viewer_id).await?;

        // Nothing followed: one empty page, no post queries.
        if author_ids.is_empty() {
            return Ok(Page::new(vec![], self.paginator.paginate(0, page)));
        }

        let total = self.post_repo.count_by_authors(&author_ids).await?;
        let bounds = self.paginator.paginate(total, page);
        let posts = self
            .post_repo
            .find_by_authors(&author_ids, bounds.limit, bounds.offset)
            .await?;

        Ok(Page::new(posts, bounds))
    }
}
