use crate::comment::index::comment_routes;
use crate::post::post_index::post_routes;
use crate::share::index::share_routes;
use crate::utils::helpers::service_name;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

/// Upper bound for urlencoded form bodies under `/blog`.
pub const FORM_BODY_LIMIT: usize = 256 * 1024;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the blog",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blog")
            .app_data(web::FormConfig::default().limit(FORM_BODY_LIMIT))
            .configure(post_routes)
            .configure(share_routes)
            .configure(comment_routes),
    )
    .service(default);
}
