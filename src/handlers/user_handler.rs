//! handlers/user_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    models::{non_empty, user_model::UpdateTokenRequest},
    services::user_service::UserService,
};

/// POST /api/users/fcm-token
pub async fn update_fcm_token_endpoint(
    user_service: web::Data<UserService>,
    body: web::Json<UpdateTokenRequest>,
) -> HttpResponse {
    let req = body.into_inner();

    let (user_id, token) = match (non_empty(&req.user_id), non_empty(&req.token)) {
        (Some(user_id), Some(token)) => (user_id, token),
        _ => {
            return HttpResponse::BadRequest().json(json!({
                "error": "Missing userId or token"
            }))
        }
    };

    match user_service.update_fcm_token(user_id, token).await {
        Ok(_) => {
            log::info!("FCM token actualizado para usuario: {}", user_id);
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": "FCM token updated successfully"
            }))
        }
        Err(e) => {
            log::error!("Error actualizando FCM token: {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to update FCM token",
                "details": format!("{:#}", e)
            }))
        }
    }
}
