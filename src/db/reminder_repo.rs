// src/db/reminder_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::reminder::ReminderType};

#[derive(Clone)]
pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tenta gravar o registro de envio. A chave primária
    /// (reservation_id, reminder_type) é a deduplicação inteira: se outra
    /// execução (ou a mesma, sobreposta) já gravou, retorna false e o
    /// chamador simplesmente não envia.
    pub async fn try_record(
        &self,
        reservation_id: Uuid,
        user_id: Uuid,
        reminder_type: ReminderType,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO reminder_sent_records (reservation_id, user_id, reminder_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (reservation_id, reminder_type) DO NOTHING
            "#,
        )
        .bind(reservation_id)
        .bind(user_id)
        .bind(reminder_type.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checagem síncrona usada pela ação manual "enviar lembrete agora".
    pub async fn exists(
        &self,
        reservation_id: Uuid,
        reminder_type: ReminderType,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reminder_sent_records
                WHERE reservation_id = $1 AND reminder_type = $2
            )
            "#,
        )
        .bind(reservation_id)
        .bind(reminder_type.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
