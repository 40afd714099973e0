// src/db/template_repo.rs

use chrono::NaiveTime;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::scheduling::{SlotTemplate, TemplateSlot},
};

#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_template<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<SlotTemplate, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let template = sqlx::query_as::<_, SlotTemplate>(
            r#"
            INSERT INTO slot_templates (name)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(name)
        .fetch_one(executor)
        .await?;
        Ok(template)
    }

    pub async fn find_template<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<SlotTemplate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let template = sqlx::query_as::<_, SlotTemplate>(
            "SELECT * FROM slot_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(template)
    }

    pub async fn list_templates(&self) -> Result<Vec<SlotTemplate>, AppError> {
        let templates = sqlx::query_as::<_, SlotTemplate>(
            "SELECT * FROM slot_templates ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(templates)
    }

    pub async fn add_template_slot<'e, E>(
        &self,
        executor: E,
        template_id: Uuid,
        day_of_week: i32,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_minutes: i32,
    ) -> Result<TemplateSlot, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, TemplateSlot>(
            r#"
            INSERT INTO template_slots (template_id, day_of_week, start_time, end_time, duration_minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(template_id)
        .bind(day_of_week)
        .bind(start_time)
        .bind(end_time)
        .bind(duration_minutes)
        .fetch_one(executor)
        .await?;
        Ok(slot)
    }

    pub async fn slots_of_template<'e, E>(
        &self,
        executor: E,
        template_id: Uuid,
    ) -> Result<Vec<TemplateSlot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slots = sqlx::query_as::<_, TemplateSlot>(
            r#"
            SELECT * FROM template_slots
            WHERE template_id = $1
            ORDER BY day_of_week ASC, start_time ASC
            "#,
        )
        .bind(template_id)
        .fetch_all(executor)
        .await?;
        Ok(slots)
    }
}
