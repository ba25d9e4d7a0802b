use crate::comment::model::CommentForm;
use crate::comment::service::CommentService;
use crate::post::post_model::{ListQuery, PageRequest, PostDatePath};
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::helpers::service_name;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Published posts, newest first, one page at a time
/// GET /blog/?page=N
pub async fn list_posts(
    query: web::Query<ListQuery>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let request = PageRequest::parse(query.page.as_deref())?;
    let page = post_service.published_page(request).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Posts fetched successfully",
        "httpStatusCode": 200,
        "service": service_name(),
        "posts": page.posts,
        "page": page.page,
        "num_pages": page.num_pages,
        "count": page.count,
        "has_next": page.has_next,
        "has_previous": page.has_previous,
    })))
}

/// A published post with its active comments and an empty comment form
/// GET /blog/{year}/{month}/{day}/{slug}
pub async fn post_detail(
    path: web::Path<PostDatePath>,
    post_service: web::Data<PostService>,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service.get_published_by_date(&path).await?;
    let comments = comment_service.active_comments(&post.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post fetched successfully",
        "httpStatusCode": 200,
        "service": service_name(),
        "post": post,
        "comments": comments,
        "form": CommentForm::empty_state(),
    })))
}
