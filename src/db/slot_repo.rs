// src/db/slot_repo.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::scheduling::{Slot, SlotStatus},
};

#[derive(Clone)]
pub struct SlotRepository {
    pool: PgPool,
}

impl SlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Criação direta pelo admin. O índice parcial
    /// `uniq_slots_date_start_alive` é quem garante a unicidade de
    /// (data, horário) entre slots vivos; aqui só traduzimos a violação.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: i32,
        status: SlotStatus,
        template_id: Option<Uuid>,
        note: Option<&str>,
    ) -> Result<Slot, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            INSERT INTO slots (date, start_time, end_time, duration_minutes, status, template_id, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(duration_minutes)
        .bind(status)
        .bind(template_id)
        .bind(note)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, &[("uniq_slots_date_start_alive", || AppError::DuplicateSlot)])
        })?;

        Ok(slot)
    }

    /// Materialização idempotente usada pelo Template Engine: se já existe
    /// slot vivo em (data, horário), não faz nada e retorna None.
    pub async fn insert_if_absent<'e, E>(
        &self,
        executor: E,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: i32,
        status: SlotStatus,
        template_id: Option<Uuid>,
    ) -> Result<Option<Slot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            INSERT INTO slots (date, start_time, end_time, duration_minutes, status, template_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (date, start_time) WHERE deleted_at IS NULL DO NOTHING
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(duration_minutes)
        .bind(status)
        .bind(template_id)
        .fetch_optional(executor)
        .await?;

        Ok(slot)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Slot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(slot)
    }

    pub async fn find_alive_at<'e, E>(
        &self,
        executor: E,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<Option<Slot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE date = $1 AND start_time = $2 AND deleted_at IS NULL",
        )
        .bind(date)
        .bind(start_time)
        .fetch_optional(executor)
        .await?;
        Ok(slot)
    }

    pub async fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Slot>, AppError> {
        let slots = sqlx::query_as::<_, Slot>(
            r#"
            SELECT * FROM slots
            WHERE date BETWEEN $1 AND $2 AND deleted_at IS NULL
            ORDER BY date ASC, start_time ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    /// Transição UNLOCKED -> RESERVED condicionada no próprio UPDATE.
    /// None = o slot não estava aberto (sumiu, bloqueado ou já ocupado).
    pub async fn mark_reserved<'e, E>(
        &self,
        executor: E,
        slot_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Slot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            UPDATE slots
            SET status = 'RESERVED', assigned_user_id = $2
            WHERE id = $1 AND status = 'UNLOCKED' AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(slot_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(slot)
    }

    /// Transição RESERVED -> UNLOCKED no cancelamento. O slot volta a
    /// ficar reservável; nunca volta para LOCKED.
    pub async fn release<'e, E>(&self, executor: E, slot_id: Uuid) -> Result<Option<Slot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            UPDATE slots
            SET status = 'UNLOCKED', assigned_user_id = NULL
            WHERE id = $1 AND status = 'RESERVED' AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(slot_id)
        .fetch_optional(executor)
        .await?;
        Ok(slot)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        slot_id: Uuid,
        status: SlotStatus,
    ) -> Result<Option<Slot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            UPDATE slots
            SET status = $2
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(slot_id)
        .bind(status)
        .fetch_optional(executor)
        .await?;
        Ok(slot)
    }

    /// Desbloqueio em massa da semana: LOCKED -> UNLOCKED em
    /// [segunda, domingo]. Retorna quantos mudaram; zero é sucesso.
    pub async fn unlock_between<'e, E>(
        &self,
        executor: E,
        monday: NaiveDate,
        sunday: NaiveDate,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE slots
            SET status = 'UNLOCKED'
            WHERE date BETWEEN $1 AND $2
              AND status = 'LOCKED'
              AND deleted_at IS NULL
            "#,
        )
        .bind(monday)
        .bind(sunday)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Soft delete, proibido enquanto RESERVED.
    /// Retorna false quando nada foi apagado.
    pub async fn soft_delete<'e, E>(&self, executor: E, slot_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE slots
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL AND status <> 'RESERVED'
            "#,
        )
        .bind(slot_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Existe reserva confirmada apontando para este slot?
    /// Usado para recusar edições que deixariam a reserva órfã.
    pub async fn has_confirmed_reservation<'e, E>(
        &self,
        executor: E,
        slot_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE slot_id = $1 AND status = 'confirmed'
            )
            "#,
        )
        .bind(slot_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }
}
