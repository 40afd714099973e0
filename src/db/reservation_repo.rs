// src/db/reservation_repo.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::booking::Reservation,
};

#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insere a reserva confirmada. A corrida clássica "duas requisições
    /// para o mesmo horário" é decidida pelo índice parcial
    /// `uniq_reservations_confirmed_start`: exatamente uma vence, a outra
    /// recebe SlotAlreadyBooked.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        slot_id: Option<Uuid>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        credits_used: i32,
        pricing_item_id: Option<Uuid>,
        note: Option<&str>,
    ) -> Result<Reservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                user_id, slot_id, date, start_time, end_time,
                status, credits_used, pricing_item_id, note
            )
            VALUES ($1, $2, $3, $4, $5, 'confirmed', $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(slot_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(credits_used)
        .bind(pricing_item_id)
        .bind(note)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                &[("uniq_reservations_confirmed_start", || AppError::SlotAlreadyBooked)],
            )
        })?;

        Ok(reservation)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(reservation)
    }

    /// Variante com lock de linha, para o cancelamento não disputar com
    /// outro cancelamento da mesma reserva.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(reservation)
    }

    /// Marca como cancelada. Condicionado em `status = 'confirmed'` para
    /// que dois cancelamentos concorrentes não dupliquem reembolso.
    pub async fn cancel<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = 'cancelled', cancelled_at = NOW()
            WHERE id = $1 AND status = 'confirmed'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(reservation)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE user_id = $1
            ORDER BY date DESC, start_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE date = $1
            ORDER BY start_time ASC
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    /// Horários de início já ocupados em uma data. Alimenta o motor de
    /// disponibilidade, que marca os candidatos correspondentes como
    /// indisponíveis.
    pub async fn confirmed_starts_on(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, AppError> {
        let starts = sqlx::query_scalar::<_, NaiveTime>(
            r#"
            SELECT start_time FROM reservations
            WHERE date = $1 AND status = 'confirmed'
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(starts)
    }

    /// Filtro grosso do agendador de lembretes: confirmadas de hoje e de
    /// amanhã. O refinamento por janela de horas acontece em memória.
    pub async fn confirmed_on_dates(
        &self,
        dates: &[NaiveDate],
    ) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE date = ANY($1) AND status = 'confirmed'
            ORDER BY date ASC, start_time ASC
            "#,
        )
        .bind(dates)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    pub async fn update_note<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        note: Option<&str>,
    ) -> Result<Option<Reservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET note = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(note)
        .fetch_optional(executor)
        .await?;
        Ok(reservation)
    }
}
