//! handlers/mod.rs
//! Módulo que agrupa los distintos handlers HTTP.

use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};
use serde_json::json;

pub mod alert_handler;
pub mod interaction_handler;
pub mod user_handler;

/// Cualquier método distinto de POST en las rutas de escritura
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(json!({ "error": "Method not allowed" }))
}

/// Body que no es JSON válido -> 400 con el mismo formato `{error}`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let resp = HttpResponse::BadRequest().json(json!({
        "error": format!("Invalid JSON body: {}", err)
    }));
    actix_web::error::InternalError::from_response(err, resp).into()
}
