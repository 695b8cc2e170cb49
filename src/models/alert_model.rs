//! models/alert_model.rs
//! Alertas de emergencia: registro persistido, requests y respuestas HTTP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grupos por defecto cuando la alerta no trae recipientGroups
pub const DEFAULT_RECIPIENT_GROUPS: [&str; 2] = ["volunteers", "public"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Warning,
    Severe,
}

impl AlertLevel {
    /// Comparación exacta: "Severe" no es un nivel válido.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "info" => Some(AlertLevel::Info),
            "warning" => Some(AlertLevel::Warning),
            "severe" => Some(AlertLevel::Severe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    Pending,
    Delivered,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Delivered => "delivered",
        }
    }
}

/// Registro en `emergency_alerts`.
/// title/message/level son opcionales porque otros caminos de escritura
/// pueden dejar registros incompletos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: String,
    pub title: Option<String>,
    pub message: Option<String>,
    pub level: Option<String>,
    pub recipient_groups: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub sent_by: Option<String>,
    pub sent_by_name: Option<String>,
    /// Texto tal cual está en la base: `AlertStatus::as_str` para los que escribimos.
    pub status: String,
    pub notifications_sent: Option<i64>,
    pub notifications_failed: Option<i64>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// Datos para insertar una alerta nueva (siempre queda en "pending")
#[derive(Debug, Clone, Default)]
pub struct NewAlert {
    pub title: Option<String>,
    pub message: Option<String>,
    pub level: Option<String>,
    pub recipient_groups: Option<Vec<String>>,
    pub sent_by: Option<String>,
    pub sent_by_name: Option<String>,
}

/// Body de POST /api/alerts/broadcast
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastAlertRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub level: Option<String>,
    pub recipient_groups: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastAlertResponse {
    pub success: bool,
    pub alert_id: String,
    pub message: String,
}

/// Resultado agregado de un dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}
