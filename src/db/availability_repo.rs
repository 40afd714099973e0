// src/db/availability_repo.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::availability::AvailabilityRule};

#[derive(Clone)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Regras semanais recorrentes (não bloqueadas) que cobrem o dia da
    /// semana pedido. 1 = Segunda ... 7 = Domingo.
    pub async fn recurring_rules_for_day(
        &self,
        day_of_week: i32,
    ) -> Result<Vec<AvailabilityRule>, AppError> {
        let rules = sqlx::query_as::<_, AvailabilityRule>(
            r#"
            SELECT * FROM availability_rules
            WHERE is_recurring = TRUE
              AND is_blocked = FALSE
              AND $1 = ANY(days_of_week)
            ORDER BY start_time ASC
            "#,
        )
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await?;
        Ok(rules)
    }

    /// Regras pontuais de uma data. `blocked` escolhe entre as que SOMAM
    /// disponibilidade (false) e as que a SUBTRAEM (true).
    pub async fn specific_rules_for_date(
        &self,
        date: NaiveDate,
        blocked: bool,
    ) -> Result<Vec<AvailabilityRule>, AppError> {
        let rules = sqlx::query_as::<_, AvailabilityRule>(
            r#"
            SELECT * FROM availability_rules
            WHERE specific_date = $1
              AND is_blocked = $2
            ORDER BY start_time ASC
            "#,
        )
        .bind(date)
        .bind(blocked)
        .fetch_all(&self.pool)
        .await?;
        Ok(rules)
    }

    // --- CRUD de administração ---

    pub async fn create_rule<'e, E>(
        &self,
        executor: E,
        owner_id: Option<Uuid>,
        name: Option<&str>,
        days_of_week: &[i32],
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_duration_minutes: i32,
        is_recurring: bool,
        specific_date: Option<NaiveDate>,
        is_blocked: bool,
    ) -> Result<AvailabilityRule, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rule = sqlx::query_as::<_, AvailabilityRule>(
            r#"
            INSERT INTO availability_rules (
                owner_id, name, days_of_week,
                start_time, end_time, slot_duration_minutes,
                is_recurring, specific_date, is_blocked
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(days_of_week)
        .bind(start_time)
        .bind(end_time)
        .bind(slot_duration_minutes)
        .bind(is_recurring)
        .bind(specific_date)
        .bind(is_blocked)
        .fetch_one(executor)
        .await?;

        Ok(rule)
    }

    pub async fn list_rules(&self) -> Result<Vec<AvailabilityRule>, AppError> {
        let rules = sqlx::query_as::<_, AvailabilityRule>(
            "SELECT * FROM availability_rules ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rules)
    }

    pub async fn delete_rule(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM availability_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
