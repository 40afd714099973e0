// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::auth::User,
};

// O repositório de usuários. Do ponto de vista do núcleo de agendamento,
// esta é a interface com o subsistema de autenticação: buscar usuário e
// aplicar deltas atômicos de crédito.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário, com tratamento de erro específico para
    // e-mails duplicados.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        first_name: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, first_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, &[("users_email_key", || AppError::EmailAlreadyExists)])
        })?;

        Ok(user)
    }

    /// Delta atômico de créditos, expresso como UM único UPDATE no banco.
    /// Nunca leia-modifique-escreva o saldo na aplicação: dois débitos
    /// concorrentes no mesmo usuário se perderiam.
    ///
    /// Retorna None quando o delta deixaria o saldo negativo (o chamador
    /// traduz para InsufficientCredits) ou quando o usuário não existe.
    pub async fn adjust_credits<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        delta: i32,
    ) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let new_balance = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE users
            SET credits = credits + $2, updated_at = NOW()
            WHERE id = $1 AND credits + $2 >= 0
            RETURNING credits
            "#,
        )
        .bind(user_id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;

        Ok(new_balance)
    }

    /// Carrega em lote os donos das reservas elegíveis a lembrete.
    pub async fn find_many_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
