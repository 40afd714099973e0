// src/db/policy_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::policy::CancellationPolicy};

#[derive(Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca a política do treinador, criando-a com os padrões
    /// (fullRefundHours = 24, noRefundHours = 0, ativa) no primeiro
    /// acesso. O ON CONFLICT cobre dois primeiros-acessos concorrentes.
    pub async fn get_or_create_default(
        &self,
        trainer_id: Uuid,
    ) -> Result<CancellationPolicy, AppError> {
        sqlx::query(
            r#"
            INSERT INTO cancellation_policies (trainer_id)
            VALUES ($1)
            ON CONFLICT (trainer_id) DO NOTHING
            "#,
        )
        .bind(trainer_id)
        .execute(&self.pool)
        .await?;

        let policy = sqlx::query_as::<_, CancellationPolicy>(
            "SELECT * FROM cancellation_policies WHERE trainer_id = $1",
        )
        .bind(trainer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(policy)
    }

    /// A política ativa do negócio. Implantação atual é de provedor
    /// único; com múltiplos treinadores a resolução passaria a receber
    /// o treinador dono do slot.
    pub async fn find_active(&self) -> Result<Option<CancellationPolicy>, AppError> {
        let policy = sqlx::query_as::<_, CancellationPolicy>(
            r#"
            SELECT * FROM cancellation_policies
            WHERE is_active = TRUE
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(policy)
    }

    /// UPSERT no estilo do restante das configurações: o PUT do admin
    /// cria ou substitui os campos da política.
    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        trainer_id: Uuid,
        full_refund_hours: i32,
        partial_refund_hours: Option<i32>,
        partial_refund_percentage: Option<i32>,
        no_refund_hours: i32,
        is_active: bool,
    ) -> Result<CancellationPolicy, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let policy = sqlx::query_as::<_, CancellationPolicy>(
            r#"
            INSERT INTO cancellation_policies (
                trainer_id, full_refund_hours, partial_refund_hours,
                partial_refund_percentage, no_refund_hours, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (trainer_id)
            DO UPDATE SET
                full_refund_hours = EXCLUDED.full_refund_hours,
                partial_refund_hours = EXCLUDED.partial_refund_hours,
                partial_refund_percentage = EXCLUDED.partial_refund_percentage,
                no_refund_hours = EXCLUDED.no_refund_hours,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(trainer_id)
        .bind(full_refund_hours)
        .bind(partial_refund_hours)
        .bind(partial_refund_percentage)
        .bind(no_refund_hours)
        .bind(is_active)
        .fetch_one(executor)
        .await?;

        Ok(policy)
    }
}
