//! services/push_service.rs
//! Envío de mensajes push por topic (FCM HTTP v1).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::{sync::OnceLock, time::Duration};

use crate::{
    config::app_config::FcmConfig,
    models::push_model::{FcmSendRequest, FcmSendResponse, PushMessage},
    services::fcm_auth::TokenProvider,
};

static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Cliente HTTP compartido por todo el proceso. Se crea una sola vez.
pub fn http_client() -> &'static Client {
    HTTP_CLIENT.get_or_init(Client::new)
}

/// Proveedor de entrega push direccionado por canal (topic).
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Envía un mensaje a `message.topic` y retorna el id asignado por el proveedor.
    async fn send(&self, message: &PushMessage) -> Result<String>;
}

pub struct FcmClient {
    send_url: String,
    tokens: TokenProvider,
    timeout: Duration,
}

impl FcmClient {
    pub fn new(config: &FcmConfig) -> Result<Self> {
        let tokens = TokenProvider::from_config(config)
            .context("No se pudieron cargar las credenciales de FCM")?;
        Ok(Self::with_token_provider(config, tokens))
    }

    pub fn with_token_provider(config: &FcmConfig, tokens: TokenProvider) -> Self {
        let send_url = format!(
            "{}/v1/projects/{}/messages:send",
            config.api_base_url.trim_end_matches('/'),
            config.project_id
        );
        Self {
            send_url,
            tokens,
            timeout: config.send_timeout,
        }
    }
}

#[async_trait]
impl PushProvider for FcmClient {
    async fn send(&self, message: &PushMessage) -> Result<String> {
        let access_token = self.tokens.access_token().await?;

        let resp = http_client()
            .post(&self.send_url)
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .json(&FcmSendRequest { message })
            .send()
            .await
            .with_context(|| format!("(fcm_send) Fallo al POST para topic '{}'", message.topic))?;

        let status = resp.status();
        if !status.is_success() {
            let body_txt = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "FCM rechazó el envío a '{}': status={}, body={}",
                message.topic,
                status,
                body_txt
            ));
        }

        let parsed = resp
            .json::<FcmSendResponse>()
            .await
            .context("Respuesta de FCM inválida")?;
        Ok(parsed.name)
    }
}
