use super::controller::post_comment;
use actix_web::web;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    // POST only; any other method gets the resource's 405
    cfg.service(web::resource("/{post_id}/comment").route(web::post().to(post_comment)));
}
