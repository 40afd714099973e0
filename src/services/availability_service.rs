// src/services/availability_service.rs

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AvailabilityRepository, ReservationRepository},
    models::availability::{AvailabilityRule, AvailableSlot, BlockedRange},
};

// O motor de disponibilidade: expande regras abstratas no conjunto de
// candidatos reserváveis de um dia. É uma visão puramente derivada —
// não consulta nem escreve na tabela de slots.
#[derive(Clone)]
pub struct AvailabilityService {
    availability_repo: AvailabilityRepository,
    reservation_repo: ReservationRepository,
}

impl AvailabilityService {
    pub fn new(
        availability_repo: AvailabilityRepository,
        reservation_repo: ReservationRepository,
    ) -> Self {
        Self { availability_repo, reservation_repo }
    }

    pub async fn get_available_slots(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AvailableSlot>, AppError> {
        // 1 = Segunda ... 7 = Domingo (mesma convenção do banco)
        let day_of_week = date.weekday().number_from_monday() as i32;

        let recurring = self.availability_repo.recurring_rules_for_day(day_of_week).await?;
        let specific = self.availability_repo.specific_rules_for_date(date, false).await?;
        let blocked_rules = self.availability_repo.specific_rules_for_date(date, true).await?;

        let blocked: Vec<BlockedRange> = blocked_rules
            .iter()
            .map(|r| BlockedRange { start: r.start_time, end: r.end_time })
            .collect();

        let reserved: HashSet<NaiveTime> = self
            .reservation_repo
            .confirmed_starts_on(date)
            .await?
            .into_iter()
            .collect();

        Ok(expand_rules(date, &recurring, &specific, &blocked, &reserved))
    }

    // --- CRUD de regras (admin) ---

    pub async fn create_rule(
        &self,
        pool: &sqlx::PgPool,
        owner_id: Option<Uuid>,
        name: Option<&str>,
        days_of_week: &[i32],
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_duration_minutes: i32,
        is_recurring: bool,
        specific_date: Option<NaiveDate>,
        is_blocked: bool,
    ) -> Result<AvailabilityRule, AppError> {
        if start_time >= end_time {
            return Err(AppError::InvalidInput(
                "O horário inicial precisa ser anterior ao final.".to_string(),
            ));
        }
        if slot_duration_minutes <= 0 {
            return Err(AppError::InvalidInput(
                "A duração da sessão precisa ser positiva.".to_string(),
            ));
        }
        // Regra recorrente sem dia selecionado não descreve nada.
        if is_recurring && days_of_week.is_empty() {
            return Err(AppError::InvalidInput(
                "Selecione ao menos um dia da semana.".to_string(),
            ));
        }
        if !is_recurring && specific_date.is_none() {
            return Err(AppError::InvalidInput(
                "Regra pontual precisa de uma data específica.".to_string(),
            ));
        }
        if days_of_week.iter().any(|d| !(1..=7).contains(d)) {
            return Err(AppError::InvalidInput(
                "Dias da semana válidos vão de 1 (segunda) a 7 (domingo).".to_string(),
            ));
        }

        self.availability_repo
            .create_rule(
                pool,
                owner_id,
                name,
                days_of_week,
                start_time,
                end_time,
                slot_duration_minutes,
                is_recurring,
                specific_date,
                is_blocked,
            )
            .await
    }

    pub async fn list_rules(&self) -> Result<Vec<AvailabilityRule>, AppError> {
        self.availability_repo.list_rules().await
    }

    pub async fn delete_rule(&self, id: Uuid) -> Result<(), AppError> {
        let affected = self.availability_repo.delete_rule(id).await?;
        if affected == 0 {
            return Err(AppError::RuleNotFound);
        }
        Ok(())
    }
}

/// Expansão pura das regras em candidatos. Zero regras => lista vazia,
/// nunca erro.
///
/// Um candidato é descartado quando:
///   - cai dentro de uma faixa bloqueada (blocked.start <= início < blocked.end);
///   - já existe reserva confirmada começando naquele horário.
/// O resto de intervalo que não comporta uma sessão inteira é descartado.
pub fn expand_rules(
    date: NaiveDate,
    recurring: &[AvailabilityRule],
    specific: &[AvailabilityRule],
    blocked: &[BlockedRange],
    reserved: &HashSet<NaiveTime>,
) -> Vec<AvailableSlot> {
    // União das duas origens, deduplicada por id.
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut candidates: Vec<AvailableSlot> = Vec::new();

    for rule in recurring.iter().chain(specific.iter()) {
        if !seen.insert(rule.id) {
            continue;
        }

        let step = Duration::minutes(rule.slot_duration_minutes as i64);
        let mut current = rule.start_time;

        loop {
            // overflowing_add: se passar da meia-noite, o dia acabou.
            let (candidate_end, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 || candidate_end > rule.end_time {
                break;
            }

            let is_blocked = blocked.iter().any(|b| b.start <= current && current < b.end);
            let is_taken = reserved.contains(&current);

            if !is_blocked && !is_taken {
                candidates.push(AvailableSlot {
                    rule_id: rule.id,
                    date,
                    start_time: current,
                    end_time: candidate_end,
                    duration_minutes: rule.slot_duration_minutes,
                });
            }

            current = candidate_end;
        }
    }

    candidates.sort_by_key(|c| c.start_time);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn t(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn rule(start: NaiveTime, end: NaiveTime, duration: i32) -> AvailabilityRule {
        AvailabilityRule {
            id: Uuid::new_v4(),
            owner_id: None,
            name: None,
            days_of_week: vec![1],
            start_time: start,
            end_time: end,
            slot_duration_minutes: duration,
            is_recurring: true,
            specific_date: None,
            is_blocked: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn expands_rule_into_back_to_back_candidates() {
        let r = rule(t(8, 0), t(12, 0), 60);
        let slots = expand_rules(date(), &[r], &[], &[], &HashSet::new());

        let starts: Vec<NaiveTime> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![t(8, 0), t(9, 0), t(10, 0), t(11, 0)]);
        assert_eq!(slots[0].end_time, t(9, 0));
    }

    #[test]
    fn trailing_partial_window_is_dropped() {
        // 08:00-09:30 com sessões de 60min: só cabe uma, a meia hora sobra.
        let r = rule(t(8, 0), t(9, 30), 60);
        let slots = expand_rules(date(), &[r], &[], &[], &HashSet::new());
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_time, t(8, 0));
    }

    #[test]
    fn zero_rules_means_empty_list_not_error() {
        let slots = expand_rules(date(), &[], &[], &[], &HashSet::new());
        assert!(slots.is_empty());
    }

    #[test]
    fn blocked_range_hides_overlapping_candidates() {
        let r = rule(t(8, 0), t(12, 0), 60);
        // Bloqueio 09:00-10:00: esconde o candidato das 09:00.
        // O das 10:00 fica, porque 10:00 não é < 10:00.
        let blocked = vec![BlockedRange { start: t(9, 0), end: t(10, 0) }];
        let slots = expand_rules(date(), &[r], &[], &blocked, &HashSet::new());

        let starts: Vec<NaiveTime> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![t(8, 0), t(10, 0), t(11, 0)]);
    }

    #[test]
    fn confirmed_reservation_hides_its_start_time() {
        let r = rule(t(8, 0), t(11, 0), 60);
        let reserved: HashSet<NaiveTime> = [t(9, 0)].into_iter().collect();
        let slots = expand_rules(date(), &[r], &[], &[], &reserved);

        let starts: Vec<NaiveTime> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![t(8, 0), t(10, 0)]);
    }

    #[test]
    fn duplicate_rule_ids_are_expanded_once() {
        let r = rule(t(8, 0), t(10, 0), 60);
        let same = r.clone();
        let slots = expand_rules(date(), &[r], &[same], &[], &HashSet::new());
        assert_eq!(slots.len(), 2); // 08:00 e 09:00, sem dobrar
    }

    #[test]
    fn output_is_sorted_across_rules() {
        let morning = rule(t(10, 0), t(11, 0), 60);
        let earlier = rule(t(8, 0), t(9, 0), 60);
        let slots = expand_rules(date(), &[morning, earlier], &[], &[], &HashSet::new());

        let starts: Vec<NaiveTime> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![t(8, 0), t(10, 0)]);
    }
}
