use std::sync::Arc;

use chrono::Utc;
use log::info;
use mongodb::bson::oid::ObjectId;

use crate::comment::model::{Comment, NewComment};
use crate::database::BlogStore;
use crate::post::post_model::Post;
use crate::utils::error::CustomError;

pub struct CommentService {
    store: Arc<dyn BlogStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        CommentService { store }
    }

    /// Attach a comment to a post. The caller has already resolved the post
    /// as published and validated the form. No moderation step: the comment
    /// is visible immediately.
    pub async fn add_comment(
        &self,
        post: &Post,
        new_comment: NewComment,
    ) -> Result<Comment, CustomError> {
        let comment = Comment::new(post.id, new_comment, Utc::now());
        self.store.insert_comment(&comment).await?;

        info!("Comment {} added to post {}", comment.id, post.id);
        Ok(comment)
    }

    /// Visible comments for a post, oldest first.
    pub async fn active_comments(&self, post_id: &ObjectId) -> Result<Vec<Comment>, CustomError> {
        self.store.active_comments(post_id).await
    }
}
