//! handlers/alert_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    models::{
        alert_model::{
            AlertLevel, BroadcastAlertRequest, BroadcastAlertResponse, NewAlert,
            DEFAULT_RECIPIENT_GROUPS,
        },
        non_empty,
    },
    services::alert_service::AlertService,
};

/// Nombre con el que se firman las alertas manuales
#[derive(Debug, Clone)]
pub struct BroadcastSender(pub String);

/// POST /api/alerts/broadcast
///
/// Crea la alerta en "pending"; el trigger de creación hace el envío.
pub async fn broadcast_alert_endpoint(
    alert_service: web::Data<AlertService>,
    sender: web::Data<BroadcastSender>,
    body: web::Json<BroadcastAlertRequest>,
) -> HttpResponse {
    let req = body.into_inner();

    let (title, message, level) = match (
        non_empty(&req.title),
        non_empty(&req.message),
        non_empty(&req.level),
    ) {
        (Some(title), Some(message), Some(level)) => (title, message, level),
        _ => {
            return HttpResponse::BadRequest().json(json!({
                "error": "Missing required fields: title, message, level"
            }))
        }
    };

    let level = match AlertLevel::parse(level) {
        Some(level) => level,
        None => {
            return HttpResponse::BadRequest().json(json!({
                "error": "Invalid level. Must be: info, warning, or severe"
            }))
        }
    };

    let new_alert = NewAlert {
        title: Some(title.to_string()),
        message: Some(message.to_string()),
        level: Some(level.as_str().to_string()),
        recipient_groups: Some(req.recipient_groups.clone().unwrap_or_else(|| {
            DEFAULT_RECIPIENT_GROUPS
                .iter()
                .map(|g| g.to_string())
                .collect()
        })),
        sent_by: Some("system".to_string()),
        sent_by_name: Some(sender.0.clone()),
    };

    match alert_service.create_alert(new_alert).await {
        Ok(alert_id) => {
            log::info!("Alerta creada y encolada para envío: {}", alert_id);
            HttpResponse::Ok().json(BroadcastAlertResponse {
                success: true,
                alert_id,
                message: "Alert created and notifications are being sent".to_string(),
            })
        }
        Err(e) => {
            log::error!("Error en broadcast_alert: {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to create alert",
                "details": format!("{:#}", e)
            }))
        }
    }
}

/// GET /api/alerts/{id}
pub async fn get_alert_endpoint(
    alert_service: web::Data<AlertService>,
    path: web::Path<String>,
) -> HttpResponse {
    let alert_id = path.into_inner();

    match alert_service.get_alert(&alert_id).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "error": "Alert not found"
        })),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "error": "Failed to load alert",
            "details": format!("{:#}", e)
        })),
    }
}
