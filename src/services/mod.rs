//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod alert_service;
pub mod dispatch_service;
pub mod fcm_auth;
pub mod interaction_service;
pub mod push_service;
pub mod trigger_service;
pub mod user_service;
