//! services/fcm_auth.rs
//! Access tokens OAuth2 para FCM: token fijo o service account (JWT RS256).

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fs;
use tokio::sync::RwLock;

use crate::{config::app_config::FcmConfig, services::push_service::http_client};

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Renovamos el token un minuto antes de que expire
const REFRESH_MARGIN_SECS: i64 = 60;

/// Campos que usamos del JSON de la service account de Google
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

enum Credentials {
    Static(String),
    ServiceAccount {
        key: ServiceAccountKey,
        encoding_key: EncodingKey,
    },
}

pub struct TokenProvider {
    credentials: Credentials,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn from_config(config: &FcmConfig) -> Result<Self> {
        if let Some(token) = &config.access_token {
            return Ok(Self::fixed(token.clone()));
        }

        let path = config
            .credentials_path
            .as_ref()
            .ok_or_else(|| anyhow!("No hay credenciales de FCM configuradas"))?;
        let raw = fs::read_to_string(path)
            .with_context(|| format!("No se pudo leer la service account en {:?}", path))?;
        let key: ServiceAccountKey =
            serde_json::from_str(&raw).context("JSON de service account inválido")?;

        Self::service_account(key)
    }

    pub fn fixed(token: String) -> Self {
        Self {
            credentials: Credentials::Static(token),
            cached: RwLock::new(None),
        }
    }

    pub fn service_account(key: ServiceAccountKey) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .context("private_key de la service account no es un PEM RSA válido")?;
        Ok(Self {
            credentials: Credentials::ServiceAccount { key, encoding_key },
            cached: RwLock::new(None),
        })
    }

    pub async fn access_token(&self) -> Result<String> {
        let (key, encoding_key) = match &self.credentials {
            Credentials::Static(token) => return Ok(token.clone()),
            Credentials::ServiceAccount { key, encoding_key } => (key, encoding_key),
        };

        if let Some(token) = self.fresh_cached_token().await {
            return Ok(token);
        }

        let mut cached = self.cached.write().await;
        // Otro task pudo renovarlo mientras esperábamos el lock
        if let Some(token) = (*cached).as_ref().filter(|t| is_fresh(t)) {
            return Ok(token.value.clone());
        }

        let token = fetch_token(key, encoding_key).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn fresh_cached_token(&self) -> Option<String> {
        let cached = self.cached.read().await;
        (*cached)
            .as_ref()
            .filter(|t| is_fresh(t))
            .map(|t| t.value.clone())
    }
}

fn is_fresh(token: &CachedToken) -> bool {
    token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > Utc::now()
}

async fn fetch_token(key: &ServiceAccountKey, encoding_key: &EncodingKey) -> Result<CachedToken> {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: FCM_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    let assertion = encode(&Header::new(Algorithm::RS256), &claims, encoding_key)
        .context("No se pudo firmar el JWT de la service account")?;

    log::info!(
        "(fetch_token) Solicitando access token para {}",
        key.client_email
    );

    let resp = http_client()
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .context("Fallo al POST al token endpoint de Google")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body_txt = resp.text().await.unwrap_or_default();
        return Err(anyhow!(
            "Token endpoint respondió {}: {}",
            status,
            body_txt
        ));
    }

    let parsed = resp
        .json::<TokenResponse>()
        .await
        .context("Respuesta del token endpoint inválida")?;

    Ok(CachedToken {
        value: parsed.access_token,
        expires_at: Utc::now() + Duration::seconds(parsed.expires_in),
    })
}
