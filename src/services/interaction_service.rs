//! services/interaction_service.rs
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::models::interaction_model::InteractionRecord;

#[derive(Clone)]
pub struct InteractionService {
    db_pool: Pool<Sqlite>,
}

impl InteractionService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        InteractionService { db_pool }
    }

    /// Agrega una interacción. `alert_id` no se valida contra las alertas.
    pub async fn log_interaction(
        &self,
        user_id: &str,
        alert_id: &str,
        action: &str,
    ) -> Result<InteractionRecord> {
        let record = InteractionRecord {
            id: Uuid::new_v4().to_string(),
            alert_id: alert_id.to_string(),
            user_id: user_id.to_string(),
            action: action.to_string(),
            timestamp: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO alert_interactions (id, alert_id, user_id, action, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&record.id)
        .bind(&record.alert_id)
        .bind(&record.user_id)
        .bind(&record.action)
        .bind(record.timestamp.to_rfc3339())
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar interacción")?;

        Ok(record)
    }

    #[cfg(test)]
    pub async fn count_for_alert(&self, alert_id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM alert_interactions WHERE alert_id = ?1")
                .bind(alert_id)
                .fetch_one(&self.db_pool)
                .await
                .context("Fallo al contar interacciones")?;
        Ok(count)
    }
}
