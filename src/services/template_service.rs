// src/services/template_service.rs

use chrono::{Days, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, time::{monday_of, sunday_of}},
    db::{SlotRepository, TemplateRepository},
    models::scheduling::{Slot, SlotStatus, SlotTemplate, TemplateSlot},
};

// Materializa padrões semanais em linhas concretas de Slot e faz o
// desbloqueio em massa da semana.
#[derive(Clone)]
pub struct TemplateService {
    template_repo: TemplateRepository,
    slot_repo: SlotRepository,
    pool: PgPool,
}

impl TemplateService {
    pub fn new(template_repo: TemplateRepository, slot_repo: SlotRepository, pool: PgPool) -> Self {
        Self { template_repo, slot_repo, pool }
    }

    pub async fn create_template(&self, name: &str) -> Result<SlotTemplate, AppError> {
        self.template_repo.create_template(&self.pool, name).await
    }

    pub async fn list_templates(&self) -> Result<Vec<SlotTemplate>, AppError> {
        self.template_repo.list_templates().await
    }

    pub async fn add_template_slot(
        &self,
        template_id: Uuid,
        day_of_week: i32,
        start_time: chrono::NaiveTime,
        end_time: chrono::NaiveTime,
        duration_minutes: i32,
    ) -> Result<TemplateSlot, AppError> {
        self.template_repo
            .find_template(&self.pool, template_id)
            .await?
            .ok_or(AppError::TemplateNotFound)?;

        self.template_repo
            .add_template_slot(&self.pool, template_id, day_of_week, start_time, end_time, duration_minutes)
            .await
    }

    /// Aplica o template à semana da data dada (normalizada para a
    /// segunda-feira). Idempotente: horários que já têm slot vivo são
    /// pulados em vez de duplicar ou falhar. Retorna SÓ o que criou.
    pub async fn apply_template(
        &self,
        template_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Vec<Slot>, AppError> {
        let mut tx = self.pool.begin().await?;

        let template = self
            .template_repo
            .find_template(&mut *tx, template_id)
            .await?
            .ok_or(AppError::TemplateNotFound)?;

        let pattern = self.template_repo.slots_of_template(&mut *tx, template_id).await?;
        let monday = monday_of(week_start);

        let mut created = Vec::new();
        for template_slot in &pattern {
            let date = slot_date_in_week(monday, template_slot.day_of_week);

            // Nasce LOCKED; o admin libera a semana quando quiser abrir
            // a agenda.
            let inserted = self
                .slot_repo
                .insert_if_absent(
                    &mut *tx,
                    date,
                    template_slot.start_time,
                    template_slot.end_time,
                    template_slot.duration_minutes,
                    SlotStatus::Locked,
                    Some(template.id),
                )
                .await?;

            if let Some(slot) = inserted {
                created.push(slot);
            }
        }

        tx.commit().await?;

        tracing::info!(
            "✅ Template '{}' aplicado à semana de {}: {} slots novos",
            template.name,
            monday,
            created.len()
        );

        Ok(created)
    }

    /// LOCKED -> UNLOCKED em massa para [segunda, domingo] da semana.
    /// Zero afetados é sucesso, não erro.
    pub async fn unlock_week(&self, week_start: NaiveDate) -> Result<u64, AppError> {
        let monday = monday_of(week_start);
        let sunday = sunday_of(week_start);

        let affected = self.slot_repo.unlock_between(&self.pool, monday, sunday).await?;

        tracing::info!("🔓 Semana de {}: {} slots desbloqueados", monday, affected);
        Ok(affected)
    }
}

/// Data concreta de um TemplateSlot dentro da semana que começa em
/// `monday`. dayOfWeek segue a convenção 1 = Segunda ... 7 = Domingo.
pub fn slot_date_in_week(monday: NaiveDate, day_of_week: i32) -> NaiveDate {
    monday + Days::new((day_of_week - 1).max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn template_days_land_inside_the_week() {
        let monday = d(2024, 6, 10);
        assert_eq!(slot_date_in_week(monday, 1), d(2024, 6, 10));
        assert_eq!(slot_date_in_week(monday, 3), d(2024, 6, 12));
        assert_eq!(slot_date_in_week(monday, 7), d(2024, 6, 16));
    }

    #[test]
    fn week_bounds_for_unlock_are_monday_to_sunday() {
        // Entrou uma quinta-feira; a faixa desbloqueada é a semana dela.
        let thursday = d(2024, 6, 13);
        assert_eq!(monday_of(thursday), d(2024, 6, 10));
        assert_eq!(sunday_of(thursday), d(2024, 6, 16));
    }
}
