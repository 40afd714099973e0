// src/db/credit_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::credits::{CreditTransaction, CreditTransactionKind, PricingItem},
};

// O livro-razão. Só há INSERT e SELECT aqui: lançamentos nunca são
// editados nem apagados.
#[derive(Clone)]
pub struct CreditRepository {
    pool: PgPool,
}

impl CreditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Um lançamento por operação que afeta saldo, SEMPRE na mesma
    /// transação que o delta em users.credits.
    pub async fn append<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        amount: i32,
        kind: CreditTransactionKind,
        reference_id: Option<Uuid>,
        note: &str,
    ) -> Result<CreditTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, CreditTransaction>(
            r#"
            INSERT INTO credit_transactions (user_id, amount, kind, reference_id, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(kind)
        .bind(reference_id)
        .bind(note)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<CreditTransaction>, AppError> {
        let entries = sqlx::query_as::<_, CreditTransaction>(
            r#"
            SELECT * FROM credit_transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Interface de leitura do catálogo de preços (sistema externo).
    pub async fn find_pricing_item<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<PricingItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, PricingItem>(
            "SELECT * FROM pricing_items WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }
}
