//! Business logic services.

pub mod comment;
pub mod feed;
pub mod feed_cache;
pub mod follow;
pub mod pagination;
pub mod post;
pub mod user;

pub use comment::{CommentService, CreateCommentInput};
pub use feed::{AuthorFeed, FeedService, GroupFeed};
pub use feed_cache::{FeedCache, FeedCacheService, MemoryFeedCache, RedisFeedCache};
pub use follow::{FollowOutcome, FollowService, UnfollowOutcome};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageBounds, Paginator};
pub use post::{CreatePostInput, EditOutcome, PostDetail, PostService, UpdatePostInput};
pub use user::UserService;
