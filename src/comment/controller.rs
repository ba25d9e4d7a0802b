use crate::comment::model::{CommentForm, NewComment};
use crate::comment::service::CommentService;
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Submit a comment on a published post
/// POST /blog/{post_id}/comment
pub async fn post_comment(
    post_id: web::Path<String>,
    form: web::Form<CommentForm>,
    post_service: web::Data<PostService>,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service.get_published(&post_id.into_inner()).await?;

    let state = form.bind();
    if !state.is_valid() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Comment form is invalid",
            "httpStatusCode": 400,
            "error": "VALIDATION_ERROR",
            "service": service_name(),
            "post": post,
            "form": state,
            "comment": null,
        })));
    }

    let comment = comment_service
        .add_comment(&post, NewComment::from(&state))
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Comment added successfully",
        "httpStatusCode": 201,
        "service": service_name(),
        "post": post,
        "form": CommentForm::empty_state(),
        "comment": comment,
    })))
}
