use super::post_controller::{list_posts, post_detail};
use actix_web::web;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(["", "/"]).route(web::get().to(list_posts)))
        .service(
            web::resource(r"/{year:\d+}/{month:\d+}/{day:\d+}/{slug}")
                .route(web::get().to(post_detail)),
        );
}
