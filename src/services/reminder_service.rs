// src/services/reminder_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Days, NaiveDateTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, time::hours_until},
    db::{ReminderRepository, ReservationRepository, UserRepository},
    models::reminder::ReminderType,
    services::mailer::Mailer,
};

// O agendador de lembretes. Deliberadamente SEM estado de processo:
// cada passada é uma função de `now`, e toda a deduplicação vive no
// registro persistido. Duas passadas sobrepostas (ou um restart no
// meio) não conseguem enviar duas vezes.
#[derive(Clone)]
pub struct ReminderService {
    reservation_repo: ReservationRepository,
    user_repo: UserRepository,
    reminder_repo: ReminderRepository,
    mailer: Arc<dyn Mailer>,
    pool: PgPool,
}

impl ReminderService {
    pub fn new(
        reservation_repo: ReservationRepository,
        user_repo: UserRepository,
        reminder_repo: ReminderRepository,
        mailer: Arc<dyn Mailer>,
        pool: PgPool,
    ) -> Self {
        Self { reservation_repo, user_repo, reminder_repo, mailer, pool }
    }

    /// Uma passada do agendador. Retorna quantos lembretes foram
    /// efetivamente disparados nesta execução.
    pub async fn run_once(&self, now: NaiveDateTime) -> Result<u32, AppError> {
        // Filtro grosso e barato: confirmadas de hoje e de amanhã.
        // As janelas de horas refinam em memória logo abaixo.
        let today = now.date();
        let dates = [today, today + Days::new(1)];
        let reservations = self.reservation_repo.confirmed_on_dates(&dates).await?;

        if reservations.is_empty() {
            return Ok(0);
        }

        let mut user_ids: Vec<Uuid> = reservations.iter().map(|r| r.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users: HashMap<Uuid, _> = self
            .user_repo
            .find_many_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut sent = 0u32;
        for reservation in &reservations {
            let Some(user) = users.get(&reservation.user_id) else {
                continue;
            };
            if !user.reminder_enabled {
                continue;
            }

            let hours = hours_until(now, reservation.date, reservation.start_time);
            let Some(reminder_type) = due_reminder(hours, user.reminder_lead_hours) else {
                continue;
            };

            // Grava ANTES de enviar: melhor perder um lembrete num crash
            // do que mandar dois. Falha de um não derruba a passada.
            match self
                .reminder_repo
                .try_record(reservation.id, user.id, reminder_type)
                .await
            {
                Ok(true) => {
                    self.dispatch(user, reservation, reminder_type);
                    sent += 1;
                }
                Ok(false) => {} // já enviado por outra passada
                Err(e) => {
                    tracing::error!(
                        "Falha ao registrar lembrete da reserva {}: {}",
                        reservation.id,
                        e
                    );
                }
            }
        }

        Ok(sent)
    }

    /// Ação manual do admin: mesma deduplicação do agendador, mas com a
    /// checagem síncrona para responder "já enviado" na hora.
    pub async fn send_manual(
        &self,
        reservation_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<ReminderType, AppError> {
        let reservation = self
            .reservation_repo
            .find_by_id(&self.pool, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        let user = self
            .user_repo
            .find_many_by_ids(&[reservation.user_id])
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::UserNotFound)?;

        // Perto da sessão vira lembrete de 1h; longe, de 24h.
        let hours = hours_until(now, reservation.date, reservation.start_time);
        let reminder_type = if hours <= 2.0 {
            ReminderType::OneHour
        } else {
            ReminderType::TwentyFourHours
        };

        if self.reminder_repo.exists(reservation_id, reminder_type).await? {
            return Err(AppError::ReminderAlreadySent);
        }
        if !self
            .reminder_repo
            .try_record(reservation_id, user.id, reminder_type)
            .await?
        {
            return Err(AppError::ReminderAlreadySent);
        }

        self.dispatch(&user, &reservation, reminder_type);
        Ok(reminder_type)
    }

    // Disparo desacoplado: o e-mail nunca segura transação nem passada.
    // Falha de transporte é logada e engolida — o registro de envio já
    // garantiu o "no máximo uma vez".
    fn dispatch(
        &self,
        user: &crate::models::auth::User,
        reservation: &crate::models::booking::Reservation,
        reminder_type: ReminderType,
    ) {
        let mailer = Arc::clone(&self.mailer);
        let to = user.email.clone();
        let first_name = user.first_name.clone();
        let date = reservation.date;
        let start_time = reservation.start_time;
        let end_time = reservation.end_time;
        let reservation_id = reservation.id;

        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_reminder_email(&to, first_name.as_deref(), date, start_time, end_time)
                .await
            {
                tracing::error!(
                    "Falha ao enviar lembrete {} da reserva {}: {}",
                    reminder_type.as_str(),
                    reservation_id,
                    e
                );
            }
        });
    }
}

/// Qual lembrete (se algum) está vencido para esta combinação de
/// proximidade e preferência do usuário.
///
/// Janelas largas de propósito: o job roda a cada 15 minutos e não
/// pode deixar a sessão escapar entre duas passadas.
pub fn due_reminder(hours_until: f64, lead_hours: i32) -> Option<ReminderType> {
    if lead_hours >= 24 && (23.0..=26.0).contains(&hours_until) {
        return Some(ReminderType::TwentyFourHours);
    }
    if lead_hours <= 1 && (0.0..=2.0).contains(&hours_until) {
        return Some(ReminderType::OneHour);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_lead_users_get_the_24h_window() {
        assert_eq!(due_reminder(24.0, 24), Some(ReminderType::TwentyFourHours));
        assert_eq!(due_reminder(23.0, 24), Some(ReminderType::TwentyFourHours));
        assert_eq!(due_reminder(26.0, 24), Some(ReminderType::TwentyFourHours));
        assert_eq!(due_reminder(22.9, 24), None);
        assert_eq!(due_reminder(26.1, 24), None);
    }

    #[test]
    fn short_lead_users_get_the_1h_window() {
        assert_eq!(due_reminder(1.0, 1), Some(ReminderType::OneHour));
        assert_eq!(due_reminder(0.0, 1), Some(ReminderType::OneHour));
        assert_eq!(due_reminder(2.0, 1), Some(ReminderType::OneHour));
        assert_eq!(due_reminder(-0.1, 1), None); // sessão já começou
        assert_eq!(due_reminder(2.1, 1), None);
    }

    #[test]
    fn lead_preference_gates_the_window() {
        // Usuário de 24h não recebe o lembrete de 1h, e vice-versa.
        assert_eq!(due_reminder(1.0, 24), None);
        assert_eq!(due_reminder(24.0, 1), None);
        // Preferências intermediárias não caem em janela alguma.
        assert_eq!(due_reminder(24.0, 12), None);
        assert_eq!(due_reminder(1.0, 12), None);
    }
}
