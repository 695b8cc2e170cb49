//! models/interaction_model.rs
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const DEFAULT_ACTION: &str = "click";

/// Body de POST /api/notifications/click
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationClickRequest {
    pub user_id: Option<String>,
    pub alert_id: Option<String>,
    pub action: Option<String>,
}

/// Fila de `alert_interactions` (solo se agrega, nunca se modifica)
#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub id: String,
    pub alert_id: String,
    pub user_id: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}
