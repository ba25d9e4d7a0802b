use std::sync::Arc;

use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;

use crate::database::BlogStore;
use crate::post::post_model::{NewPost, PageRequest, Post, PostDatePath, PostPage, num_pages};
use crate::utils::error::CustomError;
use crate::utils::slug::SlugGenerator;

pub struct PostService {
    store: Arc<dyn BlogStore>,
    slugs: SlugGenerator,
    page_size: u64,
}

impl PostService {
    pub fn new(store: Arc<dyn BlogStore>, slugs: SlugGenerator, page_size: u64) -> Self {
        PostService {
            store,
            slugs,
            page_size: page_size.max(1),
        }
    }

    /// Derive the missing fields of a new post, then persist it.
    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, CustomError> {
        let now = Utc::now();
        let mut post = Post::new(new_post, now);
        post.derive_fields(&self.slugs, now)?;

        self.store.insert_post(&post).await?;
        info!("Created post {} ({:?})", post.id, post.slug);

        Ok(post)
    }

    /// Re-save an existing post. The slug is only derived if it is missing.
    pub async fn save_post(&self, mut post: Post) -> Result<Post, CustomError> {
        post.derive_fields(&self.slugs, Utc::now())?;

        if !self.store.save_post(&post).await? {
            return Err(CustomError::NotFoundError("Post not found".into()));
        }

        Ok(post)
    }

    pub async fn delete_post(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let deleted = self.store.delete_post(id).await?;
        if deleted {
            info!("Deleted post {} and its comments", id);
        }
        Ok(deleted)
    }

    /// Cascade for a removed author: their posts and those posts' comments.
    pub async fn delete_posts_by_author(&self, author_id: &ObjectId) -> Result<u64, CustomError> {
        let deleted = self.store.delete_posts_by_author(author_id).await?;
        info!("Deleted {} posts by author {}", deleted, author_id);
        Ok(deleted)
    }

    pub async fn published_page(&self, request: PageRequest) -> Result<PostPage, CustomError> {
        let count = self.store.count_published().await?;
        let num_pages = num_pages(count, self.page_size);

        let page = match request {
            PageRequest::Last => num_pages,
            PageRequest::Number(n) if (1..=num_pages).contains(&n) => n,
            PageRequest::Number(_) => {
                return Err(CustomError::NotFoundError("Page not found".into()));
            }
        };

        let posts = self
            .store
            .published_posts((page - 1) * self.page_size, self.page_size)
            .await?;

        Ok(PostPage {
            posts,
            page,
            num_pages,
            count,
            has_next: page < num_pages,
            has_previous: page > 1,
        })
    }

    /// Resolve a dated slug to exactly one published post. Missing, draft,
    /// ambiguous and impossible-date lookups all fail the same way.
    pub async fn get_published_by_date(&self, path: &PostDatePath) -> Result<Post, CustomError> {
        let day = path.date().ok_or_else(post_not_found)?;

        let mut matches = self.store.published_on_day(day, &path.slug).await?;
        if matches.len() != 1 {
            return Err(post_not_found());
        }

        matches.pop().ok_or_else(post_not_found)
    }

    /// Resolve a post id (hex) to a published post.
    pub async fn get_published(&self, id: &str) -> Result<Post, CustomError> {
        let object_id = ObjectId::parse_str(id).map_err(|_| post_not_found())?;

        self.store
            .find_post(&object_id)
            .await?
            .filter(Post::is_published)
            .ok_or_else(post_not_found)
    }
}

fn post_not_found() -> CustomError {
    CustomError::NotFoundError("No Post matches the given query.".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::post::post_model::PostStatus;
    use chrono::{Datelike, Duration};

    fn service(page_size: u64) -> PostService {
        PostService::new(
            Arc::new(MemoryStore::new()),
            SlugGenerator::new().unwrap(),
            page_size,
        )
    }

    fn published(title: &str) -> NewPost {
        NewPost {
            status: PostStatus::Published,
            ..NewPost::new(title, "Body", ObjectId::new())
        }
    }

    fn date_path(post: &Post) -> PostDatePath {
        PostDatePath {
            year: post.publish.year(),
            month: post.publish.month(),
            day: post.publish.day(),
            slug: post.slug.clone().unwrap(),
        }
    }

    #[actix_web::test]
    async fn create_derives_slug_before_persisting() {
        let posts = service(3);
        let post = posts.create_post(published("Привет, Мир!")).await.unwrap();
        assert_eq!(post.slug.as_deref(), Some("privet-mir"));

        let found = posts.get_published(&post.id.to_hex()).await.unwrap();
        assert_eq!(found.slug, post.slug);
    }

    #[actix_web::test]
    async fn same_title_same_day_is_a_constraint_error() {
        let posts = service(3);
        let first = posts.create_post(published("Daily notes")).await.unwrap();

        let again = posts
            .create_post(NewPost {
                publish: Some(first.publish),
                ..published("Daily notes")
            })
            .await;
        assert!(matches!(again, Err(CustomError::ConstraintError(_))));

        let next_day = posts
            .create_post(NewPost {
                publish: Some(first.publish + Duration::days(1)),
                ..published("Daily notes")
            })
            .await
            .unwrap();
        assert_eq!(next_day.slug, first.slug);
    }

    #[actix_web::test]
    async fn save_keeps_slug_and_rejects_unknown_posts() {
        let posts = service(3);
        let mut post = posts.create_post(published("First title")).await.unwrap();
        post.title = "Second title".into();

        let saved = posts.save_post(post.clone()).await.unwrap();
        assert_eq!(saved.slug.as_deref(), Some("first-title"));
        assert!(saved.updated >= post.updated);

        let stranger = Post::new(published("Nobody"), Utc::now());
        assert!(matches!(
            posts.save_post(stranger).await,
            Err(CustomError::NotFoundError(_))
        ));
    }

    #[actix_web::test]
    async fn drafts_never_resolve() {
        let posts = service(3);
        let draft = posts
            .create_post(NewPost::new("Secret", "Body", ObjectId::new()))
            .await
            .unwrap();

        assert!(matches!(
            posts.get_published(&draft.id.to_hex()).await,
            Err(CustomError::NotFoundError(_))
        ));
        assert!(matches!(
            posts.get_published_by_date(&date_path(&draft)).await,
            Err(CustomError::NotFoundError(_))
        ));
        assert_eq!(posts.published_page(PageRequest::Number(1)).await.unwrap().count, 0);
    }

    #[actix_web::test]
    async fn resolves_by_date_and_slug() {
        let posts = service(3);
        let post = posts.create_post(published("Dated")).await.unwrap();
        let found = posts.get_published_by_date(&date_path(&post)).await.unwrap();
        assert_eq!(found.id, post.id);

        let mut wrong_day = date_path(&post);
        wrong_day.day = if wrong_day.day == 1 { 2 } else { 1 };
        assert!(posts.get_published_by_date(&wrong_day).await.is_err());

        assert!(posts.get_published("not-an-id").await.is_err());
    }

    #[actix_web::test]
    async fn paginates_newest_first() {
        let posts = service(3);
        let start = Utc::now() - Duration::days(30);
        for i in 0..7 {
            posts
                .create_post(NewPost {
                    publish: Some(start + Duration::days(i)),
                    ..published(&format!("Post {}", i))
                })
                .await
                .unwrap();
        }

        let first = posts.published_page(PageRequest::Number(1)).await.unwrap();
        let titles: Vec<_> = first.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Post 6", "Post 5", "Post 4"]);
        assert_eq!(first.num_pages, 3);
        assert!(first.has_next && !first.has_previous);

        let last = posts.published_page(PageRequest::Last).await.unwrap();
        assert_eq!(last.page, 3);
        assert_eq!(last.posts.len(), 1);
        assert!(!last.has_next);

        assert!(posts.published_page(PageRequest::Number(4)).await.is_err());
        assert!(posts.published_page(PageRequest::Number(0)).await.is_err());
    }

    #[actix_web::test]
    async fn delete_by_author_only_touches_that_author() {
        let posts = service(3);
        let author = ObjectId::new();
        let mine = posts
            .create_post(NewPost::new("Mine", "", author))
            .await
            .unwrap();
        posts.create_post(published("Theirs")).await.unwrap();

        assert_eq!(posts.delete_posts_by_author(&author).await.unwrap(), 1);
        assert!(!posts.delete_post(&mine.id).await.unwrap());
        assert_eq!(posts.published_page(PageRequest::Last).await.unwrap().count, 1);
    }
}
