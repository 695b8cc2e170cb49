//! services/alert_service.rs
//! Persistencia de `emergency_alerts`. Insertar publica `AlertCreated`;
//! actualizar no publica nada.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Sqlite};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::{
    models::alert_model::{AlertRecord, AlertStatus, NewAlert},
    services::trigger_service::AlertCreated,
};

#[derive(Clone)]
pub struct AlertService {
    db_pool: Pool<Sqlite>,
    events: UnboundedSender<AlertCreated>,
}

#[derive(Debug, FromRow)]
struct AlertRow {
    id: String,
    title: Option<String>,
    message: Option<String>,
    level: Option<String>,
    recipient_groups: Option<String>,
    created_at: String,
    sent_by: Option<String>,
    sent_by_name: Option<String>,
    status: String,
    notifications_sent: Option<i64>,
    notifications_failed: Option<i64>,
    sent_at: Option<String>,
}

impl AlertRow {
    fn into_record(self) -> Result<AlertRecord> {
        let recipient_groups = match self.recipient_groups {
            Some(raw) => Some(
                serde_json::from_str::<Vec<String>>(&raw)
                    .with_context(|| format!("recipient_groups inválido en alerta {}", self.id))?,
            ),
            None => None,
        };
        let sent_at = match self.sent_at {
            Some(raw) => Some(parse_timestamp(&raw)?),
            None => None,
        };

        Ok(AlertRecord {
            created_at: parse_timestamp(&self.created_at)?,
            id: self.id,
            title: self.title,
            message: self.message,
            level: self.level,
            recipient_groups,
            sent_by: self.sent_by,
            sent_by_name: self.sent_by_name,
            status: self.status,
            notifications_sent: self.notifications_sent,
            notifications_failed: self.notifications_failed,
            sent_at,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Timestamp inválido: {}", raw))?
        .with_timezone(&Utc))
}

impl AlertService {
    pub fn new(db_pool: Pool<Sqlite>, events: UnboundedSender<AlertCreated>) -> Self {
        AlertService { db_pool, events }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Fallo en migraciones")?;
        Ok(())
    }

    /// Inserta la alerta en estado "pending" y dispara el trigger de creación.
    pub async fn create_alert(&self, alert: NewAlert) -> Result<String> {
        let alert_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let groups_json = alert
            .recipient_groups
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("No se pudo serializar recipient_groups")?;

        sqlx::query(
            r#"
            INSERT INTO emergency_alerts (
                id, title, message, level, recipient_groups,
                created_at, sent_by, sent_by_name, status
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&alert_id)
        .bind(&alert.title)
        .bind(&alert.message)
        .bind(&alert.level)
        .bind(&groups_json)
        .bind(now.to_rfc3339())
        .bind(&alert.sent_by)
        .bind(&alert.sent_by_name)
        .bind(AlertStatus::Pending.as_str())
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar alerta")?;

        let record = AlertRecord {
            id: alert_id.clone(),
            title: alert.title,
            message: alert.message,
            level: alert.level,
            recipient_groups: alert.recipient_groups,
            created_at: now,
            sent_by: alert.sent_by,
            sent_by_name: alert.sent_by_name,
            status: AlertStatus::Pending.as_str().to_string(),
            notifications_sent: None,
            notifications_failed: None,
            sent_at: None,
        };

        // El registro ya existe; si nadie escucha el trigger solo queda el log.
        if self
            .events
            .send(AlertCreated {
                alert_id: alert_id.clone(),
                record,
            })
            .is_err()
        {
            log::error!(
                "(create_alert) Trigger no disponible, la alerta {} no se despachará",
                alert_id
            );
        }

        Ok(alert_id)
    }

    pub async fn get_alert(&self, alert_id: &str) -> Result<Option<AlertRecord>> {
        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            SELECT id, title, message, level, recipient_groups, created_at,
                   sent_by, sent_by_name, status,
                   notifications_sent, notifications_failed, sent_at
            FROM emergency_alerts
            WHERE id = ?1
            "#,
        )
        .bind(alert_id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al consultar alerta")?;

        row.map(AlertRow::into_record).transpose()
    }

    /// Escribe el resultado del dispatch: contadores, sent_at y status "delivered".
    pub async fn mark_delivered(&self, alert_id: &str, sent: usize, failed: usize) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE emergency_alerts
            SET notifications_sent = ?1,
                notifications_failed = ?2,
                sent_at = ?3,
                status = ?4
            WHERE id = ?5
            "#,
        )
        .bind(sent as i64)
        .bind(failed as i64)
        .bind(now)
        .bind(AlertStatus::Delivered.as_str())
        .bind(alert_id)
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar estado de la alerta")?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("No existe la alerta {}", alert_id));
        }
        Ok(())
    }
}
