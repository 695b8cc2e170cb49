//! tests/support.rs
//! Helpers compartidos: pool en memoria y un PushProvider programable.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::{collections::HashSet, sync::Mutex, time::Duration};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    models::push_model::PushMessage,
    services::{
        alert_service::AlertService,
        push_service::PushProvider,
        trigger_service::{event_bus, AlertCreated},
    },
};

/// Una sola conexión que nunca se recicla: cada conexión `:memory:` es otra base.
pub async fn memory_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("No se pudo abrir SQLite en memoria");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Fallo en migraciones de test");
    pool
}

pub struct TestStore {
    pub pool: Pool<Sqlite>,
    pub alert_service: AlertService,
    pub events: UnboundedReceiver<AlertCreated>,
}

pub async fn test_store() -> TestStore {
    let pool = memory_pool().await;
    let (tx, rx) = event_bus();
    TestStore {
        alert_service: AlertService::new(pool.clone(), tx),
        pool,
        events: rx,
    }
}

pub async fn count_alerts(pool: &Pool<Sqlite>) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM emergency_alerts")
        .fetch_one(pool)
        .await
        .expect("count")
}

/// Falla en los topics indicados y registra todo lo enviado.
/// Con `probe`, anota el status de la alerta visto en cada envío.
#[derive(Default)]
pub struct ScriptedPush {
    failing: HashSet<String>,
    probe: Option<AlertService>,
    delay: Option<Duration>,
    pub sent: Mutex<Vec<PushMessage>>,
    pub observed_status: Mutex<Vec<String>>,
}

impl ScriptedPush {
    pub fn failing_on(topics: &[&str]) -> Self {
        Self {
            failing: topics.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn probing(alert_service: AlertService) -> Self {
        Self {
            probe: Some(alert_service),
            ..Default::default()
        }
    }

    /// Cada envío tarda `delay` antes de responder.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.topic.clone())
            .collect();
        topics.sort();
        topics
    }
}

#[async_trait]
impl PushProvider for ScriptedPush {
    async fn send(&self, message: &PushMessage) -> Result<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(probe) = &self.probe {
            let alert_id = message.data.get("alertId").cloned().unwrap_or_default();
            let status = probe
                .get_alert(&alert_id)
                .await?
                .map(|r| r.status)
                .unwrap_or_default();
            self.observed_status.lock().unwrap().push(status);
        }

        let n = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(message.clone());
            sent.len()
        };

        if self.failing.contains(&message.topic) {
            return Err(anyhow!("topic {} no disponible", message.topic));
        }
        Ok(format!("projects/test/messages/{}", n))
    }
}
