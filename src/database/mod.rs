use async_trait::async_trait;
use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;

use crate::comment::model::Comment;
use crate::post::post_model::Post;
use crate::utils::error::CustomError;

pub mod db;
pub mod memory;

pub use db::MongoStore;
pub use memory::MemoryStore;

/// Persistence for posts and comments.
///
/// Implementations enforce slug uniqueness per publish day (UTC) and report
/// a violation as [`CustomError::ConstraintError`]. Deleting a post deletes
/// its comments.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn insert_post(&self, post: &Post) -> Result<(), CustomError>;

    /// Replace a stored post by id. `false` when no such post exists.
    async fn save_post(&self, post: &Post) -> Result<bool, CustomError>;

    async fn find_post(&self, id: &ObjectId) -> Result<Option<Post>, CustomError>;

    /// Published posts, newest first.
    async fn published_posts(&self, skip: u64, limit: u64) -> Result<Vec<Post>, CustomError>;

    async fn count_published(&self) -> Result<u64, CustomError>;

    /// Every published post with `slug` whose publish date falls on `day`.
    async fn published_on_day(&self, day: NaiveDate, slug: &str)
    -> Result<Vec<Post>, CustomError>;

    async fn delete_post(&self, id: &ObjectId) -> Result<bool, CustomError>;

    /// Remove every post by `author_id` and their comments. Returns the
    /// number of posts removed.
    async fn delete_posts_by_author(&self, author_id: &ObjectId) -> Result<u64, CustomError>;

    async fn insert_comment(&self, comment: &Comment) -> Result<(), CustomError>;

    /// Active comments of a post, oldest first.
    async fn active_comments(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError>;
}
