//! services/user_service.rs
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

#[derive(Clone)]
pub struct UserService {
    db_pool: Pool<Sqlite>,
}

impl UserService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        UserService { db_pool }
    }

    /// Guarda el token FCM del usuario. Si el usuario no existe se crea la fila.
    pub async fn update_fcm_token(&self, user_id: &str, token: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO users (id, fcm_token, fcm_token_updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                fcm_token = excluded.fcm_token,
                fcm_token_updated_at = excluded.fcm_token_updated_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar fcm_token")?;

        Ok(())
    }

    #[cfg(test)]
    pub async fn get_fcm_token(&self, user_id: &str) -> Result<Option<String>> {
        let token: Option<Option<String>> =
            sqlx::query_scalar("SELECT fcm_token FROM users WHERE id = ?1")
                .bind(user_id)
                .fetch_optional(&self.db_pool)
                .await
                .context("Fallo al consultar fcm_token")?;
        Ok(token.flatten())
    }
}
