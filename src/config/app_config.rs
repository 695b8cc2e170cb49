//! config/app_config.rs
//! Configuración global del servicio, leída de variables de entorno (.env).

use anyhow::{anyhow, Context, Result};
use std::{env, path::PathBuf, time::Duration};

const DEFAULT_FCM_API_BASE_URL: &str = "https://fcm.googleapis.com";
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub fcm: FcmConfig,
    pub push: PushConfig,
    /// Nombre que firma las alertas creadas desde /api/alerts/broadcast
    pub broadcast_sender_name: String,
}

/// Conexión con FCM HTTP v1
#[derive(Debug, Clone)]
pub struct FcmConfig {
    pub project_id: String,
    pub api_base_url: String,
    /// Token fijo (útil en desarrollo). Si no está, se usa la service account.
    pub access_token: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub send_timeout: Duration,
}

/// Decoración constante de cada notificación push
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub android_icon: String,
    pub web_icon_url: String,
    pub web_badge_url: String,
    pub default_sender: String,
    pub default_sender_name: String,
    pub android_ttl_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        PushConfig {
            android_icon: "ic_launcher_foreground".to_string(),
            web_icon_url: "https://alerts.example.com/icon.png".to_string(),
            web_badge_url: "https://alerts.example.com/badge.png".to_string(),
            default_sender: "system".to_string(),
            default_sender_name: "Alert Center".to_string(),
            android_ttl_secs: 86_400, // 24 horas
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la config a partir de cualquier fuente clave -> valor.
    /// Los valores vacíos cuentan como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = PushConfig::default();

        let port = match get("SERVER_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("SERVER_PORT inválido: {}", raw))?,
            None => 5022,
        };

        let send_timeout_secs = match get("FCM_SEND_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("FCM_SEND_TIMEOUT_SECS inválido: {}", raw))?,
            None => DEFAULT_SEND_TIMEOUT_SECS,
        };

        let project_id =
            get("FCM_PROJECT_ID").ok_or_else(|| anyhow!("No se definió FCM_PROJECT_ID"))?;

        let fcm = FcmConfig {
            project_id,
            api_base_url: get("FCM_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FCM_API_BASE_URL.to_string()),
            access_token: get("FCM_ACCESS_TOKEN"),
            credentials_path: get("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from),
            send_timeout: Duration::from_secs(send_timeout_secs),
        };

        if fcm.access_token.is_none() && fcm.credentials_path.is_none() {
            return Err(anyhow!(
                "Se necesita FCM_ACCESS_TOKEN o GOOGLE_APPLICATION_CREDENTIALS"
            ));
        }

        let push = PushConfig {
            android_icon: get("PUSH_ANDROID_ICON").unwrap_or(defaults.android_icon),
            web_icon_url: get("PUSH_WEB_ICON_URL").unwrap_or(defaults.web_icon_url),
            web_badge_url: get("PUSH_WEB_BADGE_URL").unwrap_or(defaults.web_badge_url),
            default_sender: defaults.default_sender,
            default_sender_name: get("PUSH_SENDER_NAME").unwrap_or(defaults.default_sender_name),
            android_ttl_secs: defaults.android_ttl_secs,
        };

        Ok(AppConfig {
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:./data/alerts.db".to_string()),
            fcm,
            push,
            broadcast_sender_name: get("BROADCAST_SENDER_NAME")
                .unwrap_or_else(|| "Alert Center Admin".to_string()),
        })
    }
}
