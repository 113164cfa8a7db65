use actix_web::{error, web};

use crate::error::AppError;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::InvalidRequest(err.to_string()))
    });

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .service(
                web::resource("/create-session")
                    .route(web::post().to(handlers::create_session))
                    .default_service(web::route().to(handlers::method_not_allowed)),
            )
            .route("/chat", web::post().to(handlers::chat))
            .route("/health", web::get().to(handlers::health_check))
            .route("/config", web::get().to(handlers::client_config)),
    )
    .route("/", web::get().to(handlers::index))
    .route("/health", web::get().to(handlers::health_check));
}
