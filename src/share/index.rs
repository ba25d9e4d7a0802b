use super::controller::{share_form, share_post};
use actix_web::web;

pub fn share_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{post_id}/share")
            .route(web::get().to(share_form))
            .route(web::post().to(share_post)),
    );
}
