// src/api/routes.rs
use actix_web::{error, web, HttpResponse, ResponseError};
use serde_json::json;

use super::handlers;
use crate::config::DEFAULT_MAX_BODY_BYTES;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_routes_with_limit(cfg, DEFAULT_MAX_BODY_BYTES);
}

/// Same routes, accepting JSON bodies up to `max_body_bytes`.
pub fn configure_routes_with_limit(cfg: &mut web::ServiceConfig, max_body_bytes: usize) {
    cfg.app_data(json_config(max_body_bytes)).service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .route("/languages", web::get().to(handlers::list_languages))
            .service(
                web::scope("/sessions")
                    .route("", web::post().to(handlers::create_session))
                    .route("/{id}", web::get().to(handlers::get_session))
                    .route("/{id}", web::delete().to(handlers::delete_session))
                    .route("/{id}/language", web::put().to(handlers::select_language))
                    .route("/{id}/source", web::put().to(handlers::set_source))
                    .route("/{id}/input", web::put().to(handlers::set_input))
                    .route("/{id}/run", web::post().to(handlers::run))
                    .route("/{id}/export", web::get().to(handlers::export_source))
            )
    );
}

/// Rejected bodies are answered with a JSON `{error}` so the shell can always read them.
fn json_config(max_body_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_body_bytes)
        .error_handler(|err, _req| {
            log::warn!("Rejected request body: {}", err);
            let resp = HttpResponse::build(err.status_code())
                .json(json!({ "error": err.to_string() }));
            error::InternalError::from_response(err, resp).into()
        })
}
