use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::TryStreamExt;
use log::{error, info};
use mongodb::bson::{DateTime as BsonDateTime, doc, oid::ObjectId};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use std::error::Error;

use super::BlogStore;
use crate::comment::model::Comment;
use crate::post::post_model::{Post, PostStatus};
use crate::utils::error::CustomError;

const DUPLICATE_KEY: i32 = 11000;
const DAY_FORMAT: &str = "%Y-%m-%d";

pub struct Database {
    pub client: Client,
}

impl Database {
    pub async fn init(mongodb_uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = ClientOptions::parse(mongodb_uri).await?;
        client_options.app_name = Some("blog_site".to_string());

        let client = Client::with_options(client_options)?;

        // Ping the server to see if you can connect to the cluster
        client
            .database("admin")
            .run_command(doc! {"ping": 1})
            .await?;

        info!("Connected successfully to MongoDB");

        Ok(Self { client })
    }
}

/// Stored shape of a post. `publish_day` only exists to back the per-day
/// unique index on slugs.
#[derive(Debug, Serialize, Deserialize)]
struct PostDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    slug: Option<String>,
    author_id: ObjectId,
    body: String,
    publish: BsonDateTime,
    publish_day: String,
    created: BsonDateTime,
    updated: BsonDateTime,
    status: PostStatus,
}

#[derive(Debug, Serialize, Deserialize)]
struct CommentDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    post_id: ObjectId,
    name: String,
    email: String,
    body: String,
    created: BsonDateTime,
    updated: BsonDateTime,
    active: bool,
}

fn to_bson(date: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(date.timestamp_millis())
}

fn from_bson(date: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(date.timestamp_millis()).unwrap_or_default()
}

impl From<&Post> for PostDocument {
    fn from(post: &Post) -> Self {
        PostDocument {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            author_id: post.author_id,
            body: post.body.clone(),
            publish: to_bson(post.publish),
            publish_day: post.publish_day().format(DAY_FORMAT).to_string(),
            created: to_bson(post.created),
            updated: to_bson(post.updated),
            status: post.status,
        }
    }
}

impl From<PostDocument> for Post {
    fn from(document: PostDocument) -> Self {
        Post {
            id: document.id,
            title: document.title,
            slug: document.slug,
            author_id: document.author_id,
            body: document.body,
            publish: from_bson(document.publish),
            created: from_bson(document.created),
            updated: from_bson(document.updated),
            status: document.status,
        }
    }
}

impl From<&Comment> for CommentDocument {
    fn from(comment: &Comment) -> Self {
        CommentDocument {
            id: comment.id,
            post_id: comment.post_id,
            name: comment.name.clone(),
            email: comment.email.clone(),
            body: comment.body.clone(),
            created: to_bson(comment.created),
            updated: to_bson(comment.updated),
            active: comment.active,
        }
    }
}

impl From<CommentDocument> for Comment {
    fn from(document: CommentDocument) -> Self {
        Comment {
            id: document.id,
            post_id: document.post_id,
            name: document.name,
            email: document.email,
            body: document.body,
            created: from_bson(document.created),
            updated: from_bson(document.updated),
            active: document.active,
        }
    }
}

fn is_duplicate_key(e: &MongoError) -> bool {
    matches!(
        *e.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == DUPLICATE_KEY
    )
}

fn write_error(context: &str, e: MongoError) -> CustomError {
    if is_duplicate_key(&e) {
        CustomError::ConstraintError(format!("{}: {}", context, e))
    } else {
        error!("{}: {}", context, e);
        CustomError::InternalServerError(format!("{}: {}", context, e))
    }
}

fn read_error(context: &str, e: MongoError) -> CustomError {
    error!("{}: {}", context, e);
    CustomError::InternalServerError(format!("{}: {}", context, e))
}

pub struct MongoStore {
    posts: Collection<PostDocument>,
    comments: Collection<CommentDocument>,
}

impl MongoStore {
    pub fn new(client: &Client, database: &str) -> Self {
        let db = client.database(database);
        MongoStore {
            posts: db.collection::<PostDocument>("posts"),
            comments: db.collection::<CommentDocument>("comments"),
        }
    }

    /// Create the listing indexes and the per-day unique slug index.
    pub async fn ensure_indexes(&self) -> Result<(), CustomError> {
        let slug_per_day = IndexModel::builder()
            .keys(doc! { "slug": 1, "publish_day": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("slug_unique_for_publish_day".to_string())
                    .build(),
            )
            .build();

        self.posts
            .create_index(IndexModel::builder().keys(doc! { "publish": -1 }).build())
            .await
            .map_err(|e| read_error("Failed to create posts index", e))?;
        self.posts
            .create_index(slug_per_day)
            .await
            .map_err(|e| read_error("Failed to create slug index", e))?;
        self.comments
            .create_index(IndexModel::builder().keys(doc! { "created": 1 }).build())
            .await
            .map_err(|e| read_error("Failed to create comments index", e))?;
        self.comments
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "post_id": 1, "created": 1 })
                    .build(),
            )
            .await
            .map_err(|e| read_error("Failed to create comments index", e))?;

        Ok(())
    }
}

#[async_trait]
impl BlogStore for MongoStore {
    async fn insert_post(&self, post: &Post) -> Result<(), CustomError> {
        self.posts
            .insert_one(PostDocument::from(post))
            .await
            .map_err(|e| write_error("Failed to create post", e))?;
        Ok(())
    }

    async fn save_post(&self, post: &Post) -> Result<bool, CustomError> {
        let result = self
            .posts
            .replace_one(doc! { "_id": post.id }, PostDocument::from(post))
            .await
            .map_err(|e| write_error("Failed to save post", e))?;

        Ok(result.matched_count > 0)
    }

    async fn find_post(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        let document = self
            .posts
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| read_error("Failed to fetch post", e))?;

        Ok(document.map(Post::from))
    }

    async fn published_posts(&self, skip: u64, limit: u64) -> Result<Vec<Post>, CustomError> {
        let cursor = self
            .posts
            .find(doc! { "status": "PUBLISHED" })
            .sort(doc! { "publish": -1 })
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await
            .map_err(|e| read_error("Failed to fetch posts", e))?;

        let documents: Vec<PostDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| read_error("Failed to collect posts", e))?;

        Ok(documents.into_iter().map(Post::from).collect())
    }

    async fn count_published(&self) -> Result<u64, CustomError> {
        self.posts
            .count_documents(doc! { "status": "PUBLISHED" })
            .await
            .map_err(|e| read_error("Failed to count posts", e))
    }

    async fn published_on_day(
        &self,
        day: NaiveDate,
        slug: &str,
    ) -> Result<Vec<Post>, CustomError> {
        let cursor = self
            .posts
            .find(doc! {
                "status": "PUBLISHED",
                "slug": slug,
                "publish_day": day.format(DAY_FORMAT).to_string(),
            })
            .limit(2)
            .await
            .map_err(|e| read_error("Failed to fetch post", e))?;

        let documents: Vec<PostDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| read_error("Failed to collect posts", e))?;

        Ok(documents.into_iter().map(Post::from).collect())
    }

    async fn delete_post(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .posts
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| write_error("Failed to delete post", e))?;

        if result.deleted_count == 0 {
            return Ok(false);
        }

        self.comments
            .delete_many(doc! { "post_id": id })
            .await
            .map_err(|e| write_error("Failed to delete comments", e))?;

        Ok(true)
    }

    async fn delete_posts_by_author(&self, author_id: &ObjectId) -> Result<u64, CustomError> {
        let documents: Vec<PostDocument> = self
            .posts
            .find(doc! { "author_id": author_id })
            .await
            .map_err(|e| read_error("Failed to fetch posts", e))?
            .try_collect()
            .await
            .map_err(|e| read_error("Failed to collect posts", e))?;

        if documents.is_empty() {
            return Ok(0);
        }

        let post_ids: Vec<ObjectId> = documents.iter().map(|d| d.id).collect();

        self.comments
            .delete_many(doc! { "post_id": { "$in": post_ids.clone() } })
            .await
            .map_err(|e| write_error("Failed to delete comments", e))?;

        let result = self
            .posts
            .delete_many(doc! { "_id": { "$in": post_ids } })
            .await
            .map_err(|e| write_error("Failed to delete posts", e))?;

        Ok(result.deleted_count)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), CustomError> {
        self.comments
            .insert_one(CommentDocument::from(comment))
            .await
            .map_err(|e| write_error("Failed to add comment", e))?;
        Ok(())
    }

    async fn active_comments(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .comments
            .find(doc! { "post_id": post_id, "active": true })
            .sort(doc! { "created": 1 })
            .await
            .map_err(|e| read_error("Failed to fetch comments", e))?;

        let documents: Vec<CommentDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| read_error("Failed to collect comments", e))?;

        Ok(documents.into_iter().map(Comment::from).collect())
    }
}
