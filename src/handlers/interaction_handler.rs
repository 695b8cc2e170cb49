//! handlers/interaction_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    models::{
        interaction_model::{NotificationClickRequest, DEFAULT_ACTION},
        non_empty,
    },
    services::interaction_service::InteractionService,
};

/// POST /api/notifications/click
pub async fn notification_click_endpoint(
    interaction_service: web::Data<InteractionService>,
    body: web::Json<NotificationClickRequest>,
) -> HttpResponse {
    let req = body.into_inner();

    let (user_id, alert_id) = match (non_empty(&req.user_id), non_empty(&req.alert_id)) {
        (Some(user_id), Some(alert_id)) => (user_id, alert_id),
        _ => {
            return HttpResponse::BadRequest().json(json!({
                "error": "Missing userId or alertId"
            }))
        }
    };
    let action = non_empty(&req.action).unwrap_or(DEFAULT_ACTION);

    match interaction_service
        .log_interaction(user_id, alert_id, action)
        .await
    {
        Ok(_) => {
            log::info!("Interacción registrada: {} -> {}", user_id, alert_id);
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Interaction logged"
            }))
        }
        Err(e) => {
            log::error!("Error registrando click de notificación: {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to log interaction"
            }))
        }
    }
}
