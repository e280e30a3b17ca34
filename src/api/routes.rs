//! Route configuration.

use actix_web::web;

use super::handlers;

/// Register all service routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(handlers::index)))
        .service(web::resource("/web_predict").route(web::post().to(handlers::web_predict)))
        .service(web::resource("/api/predict").route(web::post().to(handlers::api_predict)));
}
