//! app.rs
use crate::handlers::{
    alert_handler, interaction_handler, json_error_handler, method_not_allowed, user_handler,
};
use actix_cors::Cors;
use actix_web::web;

/// Cualquier origen puede llamar a la API.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/users/fcm-token")
                        .route(web::post().to(user_handler::update_fcm_token_endpoint))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/notifications/click")
                        .route(web::post().to(interaction_handler::notification_click_endpoint))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/alerts/broadcast")
                        .route(web::post().to(alert_handler::broadcast_alert_endpoint))
                        .default_service(web::to(method_not_allowed)),
                )
                .route("/alerts/{id}", web::get().to(alert_handler::get_alert_endpoint)),
        );
}
