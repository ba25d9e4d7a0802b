use crate::post::post_service::PostService;
use crate::share::model::{ShareForm, ShareRequest};
use crate::share::service::ShareService;
use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Empty share form for a published post
/// GET /blog/{post_id}/share
pub async fn share_form(
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service.get_published(&post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Share form",
        "httpStatusCode": 200,
        "service": service_name(),
        "post": post,
        "form": ShareForm::empty_state(),
        "sent": false,
    })))
}

/// Email a link to a published post
/// POST /blog/{post_id}/share
pub async fn share_post(
    post_id: web::Path<String>,
    form: web::Form<ShareForm>,
    post_service: web::Data<PostService>,
    share_service: web::Data<ShareService>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service.get_published(&post_id.into_inner()).await?;

    let state = form.bind();
    if !state.is_valid() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Share form is invalid",
            "httpStatusCode": 400,
            "error": "VALIDATION_ERROR",
            "service": service_name(),
            "post": post,
            "form": state,
            "sent": false,
        })));
    }

    let post_url = share_service.post_url(&post);
    let sent = share_service
        .share_post(&post, &post_url, &ShareRequest::from(&state))
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post shared successfully",
        "httpStatusCode": 200,
        "service": service_name(),
        "post": post,
        "form": state,
        "sent": sent,
    })))
}
