//! services/dispatch_service.rs
//! Fan-out de una alerta recién creada: grupos -> canales -> un mensaje push
//! por canal. Al final se escriben los contadores una sola vez.

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::join_all;
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    config::app_config::PushConfig,
    models::{
        alert_model::{AlertLevel, AlertRecord, DispatchSummary, DEFAULT_RECIPIENT_GROUPS},
        non_empty,
        push_model::{
            AndroidConfig, AndroidNotification, AndroidPriority, ApnsConfig, ApnsPayload, Aps,
            PushMessage, PushNotification, WebpushConfig, WebpushNotification,
        },
    },
    services::{alert_service::AlertService, push_service::PushProvider},
};

/// Canal global: toda alerta llega aquí, sin importar los grupos.
pub const ALL_CHANNEL: &str = "all-channel";

const COLOR_SEVERE: &str = "#D32F2F"; // rojo
const COLOR_WARNING: &str = "#F57C00"; // naranja
const COLOR_INFO: &str = "#1976D2"; // azul

/// Mapea una etiqueta de grupo a su canal.
pub fn channel_for_group(label: &str) -> String {
    match label.to_lowercase().as_str() {
        "admin" | "admins" => "admin-channel".to_string(),
        "volunteer" | "volunteers" => "volunteer-channel".to_string(),
        "public" => "public-channel".to_string(),
        _ => format!("{}-channel", label),
    }
}

/// Canales de una alerta: uno por grupo (o los grupos por defecto) + `all-channel`.
pub fn resolve_channels(recipient_groups: Option<&[String]>) -> Vec<String> {
    let mut channels: Vec<String> = match recipient_groups {
        Some(groups) if !groups.is_empty() => {
            groups.iter().map(|g| channel_for_group(g)).collect()
        }
        _ => DEFAULT_RECIPIENT_GROUPS
            .iter()
            .map(|g| channel_for_group(g))
            .collect(),
    };
    channels.push(ALL_CHANNEL.to_string());
    channels
}

/// Campos obligatorios de una alerta ya validada
#[derive(Debug, Clone, Copy)]
pub struct ValidAlert<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub level: &'a str,
    pub sent_by: Option<&'a str>,
    pub sent_by_name: Option<&'a str>,
}

impl<'a> ValidAlert<'a> {
    /// `None` si falta title, message o level.
    pub fn from_record(record: &'a AlertRecord) -> Option<Self> {
        Some(ValidAlert {
            title: non_empty(&record.title)?,
            message: non_empty(&record.message)?,
            level: non_empty(&record.level)?,
            sent_by: non_empty(&record.sent_by),
            sent_by_name: non_empty(&record.sent_by_name),
        })
    }
}

fn priority_for(level: Option<AlertLevel>) -> AndroidPriority {
    match level {
        Some(AlertLevel::Severe) | Some(AlertLevel::Warning) => AndroidPriority::High,
        _ => AndroidPriority::Normal,
    }
}

fn color_for(level: Option<AlertLevel>) -> &'static str {
    match level {
        Some(AlertLevel::Severe) => COLOR_SEVERE,
        Some(AlertLevel::Warning) => COLOR_WARNING,
        _ => COLOR_INFO,
    }
}

/// Construye el mensaje de un canal. Todos los canales comparten título y cuerpo.
pub fn build_message(
    alert_id: &str,
    alert: &ValidAlert<'_>,
    channel: &str,
    config: &PushConfig,
    generated_at: DateTime<Utc>,
) -> PushMessage {
    let level = AlertLevel::parse(alert.level);
    let severe = level == Some(AlertLevel::Severe);

    let notification = PushNotification {
        title: alert.title.to_string(),
        body: alert.message.to_string(),
    };

    let mut data = BTreeMap::new();
    data.insert("alertId".to_string(), alert_id.to_string());
    data.insert("level".to_string(), alert.level.to_string());
    data.insert("title".to_string(), alert.title.to_string());
    data.insert("message".to_string(), alert.message.to_string());
    data.insert(
        "timestamp".to_string(),
        generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    data.insert(
        "sentBy".to_string(),
        alert.sent_by.unwrap_or(&config.default_sender).to_string(),
    );
    data.insert(
        "sentByName".to_string(),
        alert
            .sent_by_name
            .unwrap_or(&config.default_sender_name)
            .to_string(),
    );

    let mut web_data = BTreeMap::new();
    web_data.insert("alertId".to_string(), alert_id.to_string());
    web_data.insert("level".to_string(), alert.level.to_string());

    PushMessage {
        topic: channel.to_string(),
        notification: notification.clone(),
        data,
        android: AndroidConfig {
            priority: priority_for(level),
            ttl: format!("{}s", config.android_ttl_secs),
            notification: AndroidNotification {
                title: notification.title.clone(),
                body: notification.body.clone(),
                color: color_for(level).to_string(),
                icon: config.android_icon.clone(),
                sound: "default".to_string(),
                channel_id: if severe { "emergency" } else { "alerts" }.to_string(),
                default_sound: true,
                default_vibrate_timings: true,
            },
        },
        apns: ApnsConfig {
            payload: ApnsPayload {
                aps: Aps {
                    alert: notification.clone(),
                    badge: 1,
                    sound: "default".to_string(),
                    category: if severe {
                        "EMERGENCY_ALERT"
                    } else {
                        "REGULAR_ALERT"
                    }
                    .to_string(),
                },
            },
        },
        webpush: WebpushConfig {
            notification: WebpushNotification {
                title: notification.title,
                body: notification.body,
                icon: config.web_icon_url.clone(),
                badge: config.web_badge_url.clone(),
                tag: format!("alert-{}", alert_id),
                require_interaction: severe,
            },
            data: web_data,
        },
    }
}

#[derive(Clone)]
pub struct DispatchService {
    alert_service: AlertService,
    push: Arc<dyn PushProvider>,
    push_config: Arc<PushConfig>,
}

impl DispatchService {
    pub fn new(
        alert_service: AlertService,
        push: Arc<dyn PushProvider>,
        push_config: Arc<PushConfig>,
    ) -> Self {
        Self {
            alert_service,
            push,
            push_config,
        }
    }

    /// Despacha una alerta recién creada.
    ///
    /// Retorna `Ok(None)` si la alerta no trae title/message/level: no se envía
    /// nada ni se escribe estado. Los fallos de envío por canal solo se cuentan;
    /// un error al escribir el estado final sí se propaga.
    pub async fn dispatch(
        &self,
        alert_id: &str,
        record: &AlertRecord,
    ) -> Result<Option<DispatchSummary>> {
        log::info!("(dispatch) Nueva alerta creada: {}", alert_id);

        let alert = match ValidAlert::from_record(record) {
            Some(alert) => alert,
            None => {
                log::error!(
                    "(dispatch) Alerta {} inválida: faltan title, message o level",
                    alert_id
                );
                return Ok(None);
            }
        };

        let channels = resolve_channels(record.recipient_groups.as_deref());
        log::info!("(dispatch) Canales para {}: {:?}", alert_id, channels);

        let generated_at = Utc::now();
        let messages: Vec<PushMessage> = channels
            .iter()
            .map(|ch| build_message(alert_id, &alert, ch, &self.push_config, generated_at))
            .collect();

        // Todos los envíos en paralelo; cada uno deja su propio resultado.
        let results = join_all(messages.iter().map(|msg| async move {
            let result = self.push.send(msg).await;
            match &result {
                Ok(provider_id) => log::info!(
                    "(dispatch) Notificación enviada a '{}': {}",
                    msg.topic,
                    provider_id
                ),
                Err(e) => log::error!(
                    "(dispatch) Error enviando a '{}': {:?}",
                    msg.topic,
                    e
                ),
            }
            result
        }))
        .await;

        let sent = results.iter().filter(|r| r.is_ok()).count();
        let summary = DispatchSummary {
            sent,
            failed: results.len() - sent,
        };

        log::info!(
            "(dispatch) Resumen {}: enviados={}, fallidos={}",
            alert_id,
            summary.sent,
            summary.failed
        );

        self.alert_service
            .mark_delivered(alert_id, summary.sent, summary.failed)
            .await?;

        log::info!("(dispatch) Alerta {} procesada", alert_id);
        Ok(Some(summary))
    }
}
