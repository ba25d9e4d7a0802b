use std::sync::Arc;

use log::{error, info};

use crate::post::post_model::Post;
use crate::share::model::ShareRequest;
use crate::utils::email::{MailTransport, OutgoingEmail};
use crate::utils::error::CustomError;

pub struct ShareService {
    mailer: Arc<dyn MailTransport>,
    base_url: String,
}

/// Fixed-template recommendation mail for `post`, linking to `post_url`.
pub fn compose_share_email(post: &Post, post_url: &str, request: &ShareRequest) -> OutgoingEmail {
    OutgoingEmail {
        to: request.to.clone(),
        subject: format!("{} recommends you read \"{}\"", request.name, post.title),
        body: format!(
            "Read \"{}\" at {}\n\n{}'s comments: {}",
            post.title, post_url, request.name, request.comments
        ),
    }
}

impl ShareService {
    /// `base_url` is the configured public origin. Request headers never
    /// influence the links this service sends.
    pub fn new(mailer: Arc<dyn MailTransport>, base_url: &str) -> Self {
        ShareService {
            mailer,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn post_url(&self, post: &Post) -> String {
        format!("{}{}", self.base_url, post.absolute_path())
    }

    /// Hand the recommendation to the transport. One attempt; a transport
    /// failure is a server error.
    pub async fn share_post(
        &self,
        post: &Post,
        post_url: &str,
        request: &ShareRequest,
    ) -> Result<bool, CustomError> {
        let email = compose_share_email(post, post_url, request);

        self.mailer.send(email).await.map_err(|e| {
            error!("Failed to share post {}: {}", post.id, e);
            CustomError::InternalServerError(format!("Failed to send email: {}", e))
        })?;

        info!("Post {} shared by {} with {}", post.id, request.email, request.to);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::post_model::NewPost;
    use async_trait::async_trait;
    use chrono::Utc;
    use mongodb::bson::oid::ObjectId;

    struct FailingMailer;

    #[async_trait]
    impl MailTransport for FailingMailer {
        async fn send(&self, _email: OutgoingEmail) -> Result<(), String> {
            Err("connection refused".into())
        }
    }

    fn request() -> ShareRequest {
        ShareRequest {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            to: "bob@example.com".into(),
            comments: "Worth a look".into(),
        }
    }

    #[test]
    fn composes_subject_and_body() {
        let post = Post::new(NewPost::new("Rust tips", "", ObjectId::new()), Utc::now());
        let email = compose_share_email(&post, "http://blog.test/blog/2024/1/2/rust-tips", &request());

        assert_eq!(email.to, "bob@example.com");
        assert_eq!(email.subject, "Ann recommends you read \"Rust tips\"");
        assert_eq!(
            email.body,
            "Read \"Rust tips\" at http://blog.test/blog/2024/1/2/rust-tips\n\nAnn's comments: Worth a look"
        );
    }

    #[test]
    fn post_url_joins_configured_origin() {
        let mut post = Post::new(NewPost::new("Rust tips", "", ObjectId::new()), Utc::now());
        post.slug = Some("rust-tips".into());
        let service = ShareService::new(Arc::new(FailingMailer), "https://blog.example.org/");

        assert_eq!(
            service.post_url(&post),
            format!("https://blog.example.org{}", post.absolute_path())
        );
    }

    #[actix_web::test]
    async fn transport_failure_propagates() {
        let post = Post::new(NewPost::new("Rust tips", "", ObjectId::new()), Utc::now());
        let service = ShareService::new(Arc::new(FailingMailer), "http://blog.test");

        let result = service.share_post(&post, "http://x/", &request()).await;
        assert!(matches!(result, Err(CustomError::InternalServerError(_))));
    }
}
