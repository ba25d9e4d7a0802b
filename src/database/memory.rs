use async_trait::async_trait;
use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::BlogStore;
use crate::comment::model::Comment;
use crate::post::post_model::{Post, published_only};
use crate::utils::error::CustomError;

/// In-process store for local runs and tests. Holds the same constraints as
/// the MongoDB collections, including the per-day slug index.
#[derive(Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<Post>>,
    comments: RwLock<Vec<Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_slug_unique(posts: &[Post], candidate: &Post) -> Result<(), CustomError> {
    let Some(slug) = candidate.slug.as_deref() else {
        return Ok(());
    };
    let day = candidate.publish_day();

    let clash = posts.iter().any(|p| {
        p.id != candidate.id && p.slug.as_deref() == Some(slug) && p.publish_day() == day
    });

    if clash {
        return Err(CustomError::ConstraintError(format!(
            "slug {:?} already used on {}",
            slug, day
        )));
    }
    Ok(())
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn insert_post(&self, post: &Post) -> Result<(), CustomError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(CustomError::ConstraintError(format!(
                "post {} already exists",
                post.id
            )));
        }
        check_slug_unique(&posts, post)?;
        posts.push(post.clone());
        Ok(())
    }

    async fn save_post(&self, post: &Post) -> Result<bool, CustomError> {
        let mut posts = self.posts.write().await;
        let Some(index) = posts.iter().position(|p| p.id == post.id) else {
            return Ok(false);
        };

        check_slug_unique(&posts, post)?;
        posts[index] = post.clone();
        Ok(true)
    }

    async fn find_post(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == *id).cloned())
    }

    async fn published_posts(&self, skip: u64, limit: u64) -> Result<Vec<Post>, CustomError> {
        let posts = self.posts.read().await;
        Ok(published_only(posts.iter().cloned())
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count_published(&self) -> Result<u64, CustomError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().filter(|p| p.is_published()).count() as u64)
    }

    async fn published_on_day(
        &self,
        day: NaiveDate,
        slug: &str,
    ) -> Result<Vec<Post>, CustomError> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .filter(|p| p.is_published())
            .filter(|p| p.slug.as_deref() == Some(slug) && p.publish_day() == day)
            .cloned()
            .collect())
    }

    async fn delete_post(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != *id);
        if posts.len() == before {
            return Ok(false);
        }

        self.comments.write().await.retain(|c| c.post_id != *id);
        Ok(true)
    }

    async fn delete_posts_by_author(&self, author_id: &ObjectId) -> Result<u64, CustomError> {
        let mut posts = self.posts.write().await;
        let removed: Vec<ObjectId> = posts
            .iter()
            .filter(|p| p.author_id == *author_id)
            .map(|p| p.id)
            .collect();
        posts.retain(|p| p.author_id != *author_id);

        self.comments
            .write()
            .await
            .retain(|c| !removed.contains(&c.post_id));

        Ok(removed.len() as u64)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), CustomError> {
        self.comments.write().await.push(comment.clone());
        Ok(())
    }

    async fn active_comments(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        let comments = self.comments.read().await;
        let mut active: Vec<Comment> = comments
            .iter()
            .filter(|c| c.post_id == *post_id && c.active)
            .cloned()
            .collect();
        active.sort_by_key(|c| c.created);
        Ok(active)
    }
}
