//! models/push_model.rs
//! Mensaje FCM HTTP v1 (solo los campos que usamos).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    /// Topic = canal de destino ("volunteer-channel", "all-channel", ...)
    pub topic: String,
    pub notification: PushNotification,
    pub data: BTreeMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
    pub webpush: WebpushConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidPriority {
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndroidConfig {
    pub priority: AndroidPriority,
    /// Duración en formato protobuf, p.ej. "86400s"
    pub ttl: String,
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndroidNotification {
    pub title: String,
    pub body: String,
    pub color: String,
    pub icon: String,
    pub sound: String,
    pub channel_id: String,
    pub default_sound: bool,
    pub default_vibrate_timings: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aps {
    pub alert: PushNotification,
    pub badge: u32,
    pub sound: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebpushConfig {
    pub notification: WebpushNotification,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebpushNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub require_interaction: bool,
}

/// Body de `messages:send`
#[derive(Debug, Serialize)]
pub struct FcmSendRequest<'a> {
    pub message: &'a PushMessage,
}

/// Respuesta exitosa de `messages:send`
#[derive(Debug, Deserialize)]
pub struct FcmSendResponse {
    /// "projects/{project}/messages/{id}"
    pub name: String,
}
