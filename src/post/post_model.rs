use chrono::{DateTime, Datelike, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::serialize_object_id_as_hex_string;
use serde::{Deserialize, Serialize};

use crate::utils::error::CustomError;
use crate::utils::slug::SlugGenerator;

pub const TITLE_MAX_LENGTH: usize = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Serialize, Clone)]
pub struct Post {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub title: String,
    pub slug: Option<String>,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub author_id: ObjectId,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
}

/// Input for a new post. `created`/`updated` are never taken from callers.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub author_id: ObjectId,
    pub slug: Option<String>,
    pub publish: Option<DateTime<Utc>>,
    pub status: PostStatus,
}

impl NewPost {
    /// A draft with no pre-assigned slug, published "now" once saved.
    pub fn new(title: impl Into<String>, body: impl Into<String>, author_id: ObjectId) -> Self {
        NewPost {
            title: title.into(),
            body: body.into(),
            author_id,
            slug: None,
            publish: None,
            status: PostStatus::Draft,
        }
    }
}

impl Post {
    pub fn new(new_post: NewPost, now: DateTime<Utc>) -> Self {
        Post {
            id: ObjectId::new(),
            title: new_post.title,
            slug: new_post.slug,
            author_id: new_post.author_id,
            body: new_post.body,
            publish: new_post.publish.unwrap_or(now),
            created: now,
            updated: now,
            status: new_post.status,
        }
    }

    /// Fill in everything the system owns before a write: the slug when it
    /// is absent, and the `updated` stamp. An existing slug is kept even if
    /// the title changed.
    pub fn derive_fields(
        &mut self,
        slugs: &SlugGenerator,
        now: DateTime<Utc>,
    ) -> Result<(), CustomError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CustomError::ValidationError("Post title is required".into()));
        }
        if title.chars().count() > TITLE_MAX_LENGTH {
            return Err(CustomError::ValidationError(format!(
                "Post title must be at most {} characters",
                TITLE_MAX_LENGTH
            )));
        }

        if let Some(slug) = self.slug.as_deref().filter(|s| !s.is_empty()) {
            if !slugs.is_valid(slug) {
                return Err(CustomError::ValidationError(format!(
                    "Invalid slug: {:?}",
                    slug
                )));
            }
        } else {
            let slug = slugs.slugify(title);
            if slug.is_empty() {
                return Err(CustomError::ValidationError(
                    "Post title does not produce a slug".into(),
                ));
            }
            self.slug = Some(slug);
        }

        self.updated = now;
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Calendar day (UTC) that scopes slug uniqueness and detail lookups.
    pub fn publish_day(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Canonical detail path for this post.
    pub fn absolute_path(&self) -> String {
        format!(
            "/blog/{}/{}/{}/{}",
            self.publish.year(),
            self.publish.month(),
            self.publish.day(),
            self.slug.as_deref().unwrap_or_default()
        )
    }
}

/// Restrict `posts` to published ones, newest first.
pub fn published_only(posts: impl IntoIterator<Item = Post>) -> Vec<Post> {
    let mut published: Vec<Post> = posts.into_iter().filter(Post::is_published).collect();
    published.sort_by(|a, b| b.publish.cmp(&a.publish));
    published
}

#[derive(Debug, Deserialize)]
pub struct PostDatePath {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub slug: String,
}

impl PostDatePath {
    /// `None` for impossible dates such as 2024/2/30.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Number(u64),
    Last,
}

impl PageRequest {
    pub fn parse(raw: Option<&str>) -> Result<Self, CustomError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(PageRequest::Number(1)),
            Some("last") => Ok(PageRequest::Last),
            Some(value) => value
                .parse::<u64>()
                .map(PageRequest::Number)
                .map_err(|_| CustomError::NotFoundError("Invalid page".into())),
        }
    }
}

/// One page of the published listing.
#[derive(Debug, Serialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub page: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Number of pages for `count` items; an empty listing still has one page.
pub fn num_pages(count: u64, page_size: u64) -> u64 {
    count.div_ceil(page_size.max(1)).max(1)
}
