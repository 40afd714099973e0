// src/services/booking_service.rs

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, time::hours_until},
    db::{CreditRepository, ReservationRepository, SlotRepository, UserRepository},
    models::{
        booking::{RefundDecision, Reservation, ReservationStatus},
        credits::CreditTransactionKind,
        policy::RefundTier,
        scheduling::{Slot, SlotStatus},
    },
    services::{audit::{AuditEvent, AuditSink}, policy_service::PolicyService},
};

// O motor de reservas. Cada operação pública aqui é UMA transação de
// banco: linha de reserva, transição do slot, delta de crédito e
// lançamento no livro-razão entram (ou saem) juntos.
#[derive(Clone)]
pub struct BookingService {
    reservation_repo: ReservationRepository,
    slot_repo: SlotRepository,
    user_repo: UserRepository,
    credit_repo: CreditRepository,
    policy_service: PolicyService,
    audit: Arc<dyn AuditSink>,
    pool: PgPool,
}

impl BookingService {
    pub fn new(
        reservation_repo: ReservationRepository,
        slot_repo: SlotRepository,
        user_repo: UserRepository,
        credit_repo: CreditRepository,
        policy_service: PolicyService,
        audit: Arc<dyn AuditSink>,
        pool: PgPool,
    ) -> Self {
        Self {
            reservation_repo,
            slot_repo,
            user_repo,
            credit_repo,
            policy_service,
            audit,
            pool,
        }
    }

    /// Reserva self-service de um candidato vindo do motor de
    /// disponibilidade. O candidato é efêmero; aqui ele vira (ou reusa)
    /// uma linha de Slot — uma identidade única de unidade reservável,
    /// dois caminhos de construção.
    pub async fn create_reservation(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        pricing_item_id: Option<Uuid>,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Usuário e custo em créditos
        let user = self
            .user_repo
            .find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let required = match pricing_item_id {
            Some(item_id) => {
                self.credit_repo
                    .find_pricing_item(&mut *tx, item_id)
                    .await?
                    .ok_or(AppError::PricingItemNotFound)?
                    .credits
            }
            None => 1,
        };

        // Cortesia de fast-fail; a garantia real é o UPDATE condicionado
        // lá embaixo.
        if user.credits < required {
            return Err(AppError::InsufficientCredits);
        }

        // 2. Materializa (ou reusa) o slot em (data, horário)
        let slot = self
            .resolve_bookable_slot(&mut tx, date, start_time, end_time)
            .await?;

        // 3. Linha de reserva. Se outra requisição venceu a corrida pelo
        //    mesmo horário, o índice único responde SlotAlreadyBooked.
        let reservation = self
            .reservation_repo
            .insert(
                &mut *tx,
                user_id,
                Some(slot.id),
                date,
                start_time,
                end_time,
                required,
                pricing_item_id,
                None,
            )
            .await?;

        // 4. UNLOCKED -> RESERVED
        self.slot_repo
            .mark_reserved(&mut *tx, slot.id, user_id)
            .await?
            .ok_or(AppError::SlotAlreadyBooked)?;

        // 5. Débito atômico + lançamento no razão
        self.user_repo
            .adjust_credits(&mut *tx, user_id, -required)
            .await?
            .ok_or(AppError::InsufficientCredits)?;

        self.credit_repo
            .append(
                &mut *tx,
                user_id,
                -required,
                CreditTransactionKind::Reservation,
                Some(reservation.id),
                "Reserva de horário",
            )
            .await?;

        tx.commit().await?;

        tracing::info!("✅ Reserva {} criada para o usuário {}", reservation.id, user_id);
        self.audit.publish(AuditEvent {
            actor: Some(user_id),
            action: "reservation.create",
            target: reservation.id,
            before: serde_json::Value::Null,
            after: json!(&reservation),
        });

        Ok(reservation)
    }

    /// Reserva assistida pelo admin sobre um slot já materializado.
    /// `deduct_credits` substitui o item de preço: true debita o custo
    /// padrão de 1 crédito, false registra a reserva como cortesia.
    pub async fn admin_create_reservation(
        &self,
        admin_id: Uuid,
        user_id: Uuid,
        slot_id: Uuid,
        deduct_credits: bool,
        note: Option<&str>,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        let slot = self
            .slot_repo
            .find_by_id(&mut *tx, slot_id)
            .await?
            .ok_or(AppError::SlotNotFound)?;

        self.user_repo
            .find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let required = if deduct_credits { 1 } else { 0 };

        let reservation = self
            .reservation_repo
            .insert(
                &mut *tx,
                user_id,
                Some(slot.id),
                slot.date,
                slot.start_time,
                slot.end_time,
                required,
                None,
                note,
            )
            .await?;

        self.slot_repo
            .mark_reserved(&mut *tx, slot.id, user_id)
            .await?
            .ok_or(AppError::SlotNotBookable)?;

        if required > 0 {
            self.user_repo
                .adjust_credits(&mut *tx, user_id, -required)
                .await?
                .ok_or(AppError::InsufficientCredits)?;

            self.credit_repo
                .append(
                    &mut *tx,
                    user_id,
                    -required,
                    CreditTransactionKind::Reservation,
                    Some(reservation.id),
                    "Reserva criada pelo administrador",
                )
                .await?;
        }

        tx.commit().await?;

        self.audit.publish(AuditEvent {
            actor: Some(admin_id),
            action: "reservation.create",
            target: reservation.id,
            before: serde_json::Value::Null,
            after: json!(&reservation),
        });

        Ok(reservation)
    }

    /// Cancelamento com decisão de reembolso explícita do chamador.
    /// `actor_user_id = Some(x)` impõe que a reserva pertença a x
    /// (caminho self-service); None é o caminho do admin.
    pub async fn cancel_reservation(
        &self,
        actor_user_id: Option<Uuid>,
        admin_id: Option<Uuid>,
        reservation_id: Uuid,
        decision: RefundDecision,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock de linha: dois cancelamentos simultâneos da mesma reserva
        // serializam aqui, e o segundo recebe AlreadyCancelled.
        let reservation = self
            .reservation_repo
            .find_by_id_for_update(&mut *tx, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if reservation.status == ReservationStatus::Cancelled {
            return Err(AppError::AlreadyCancelled);
        }

        if let Some(actor) = actor_user_id {
            if reservation.user_id != actor {
                return Err(AppError::Forbidden);
            }
        }

        let cancelled = self
            .reservation_repo
            .cancel(&mut *tx, reservation_id)
            .await?
            .ok_or(AppError::AlreadyCancelled)?;

        // O slot volta a ficar reservável (nunca volta para LOCKED).
        if let Some(slot_id) = reservation.slot_id {
            self.slot_repo.release(&mut *tx, slot_id).await?;
        }

        let refund = decision.credits_for(reservation.credits_used);
        if refund > 0 {
            self.user_repo
                .adjust_credits(&mut *tx, reservation.user_id, refund)
                .await?
                .ok_or(AppError::UserNotFound)?;

            self.credit_repo
                .append(
                    &mut *tx,
                    reservation.user_id,
                    refund,
                    CreditTransactionKind::Refund,
                    Some(reservation.id),
                    "Reembolso de cancelamento",
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "✅ Reserva {} cancelada (reembolso de {} créditos)",
            reservation_id,
            refund
        );
        self.audit.publish(AuditEvent {
            actor: admin_id.or(actor_user_id),
            action: "reservation.cancel",
            target: reservation_id,
            before: json!(&reservation),
            after: json!(&cancelled),
        });

        Ok(cancelled)
    }

    /// Cancelamento self-service: o reembolso não é escolha do cliente,
    /// é o que a política de cancelamento mandar — inclusive parcial.
    pub async fn cancel_own_with_policy(
        &self,
        user_id: Uuid,
        reservation_id: Uuid,
    ) -> Result<(Reservation, i32, RefundTier), AppError> {
        let reservation = self
            .reservation_repo
            .find_by_id(&self.pool, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        if reservation.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        let now = Local::now().naive_local();
        let hours = hours_until(now, reservation.date, reservation.start_time);
        let (amount, tier) = self
            .policy_service
            .policy_refund_for(reservation.credits_used, hours)
            .await?;

        let cancelled = self
            .cancel_reservation(
                Some(user_id),
                None,
                reservation_id,
                RefundDecision::Amount(amount),
            )
            .await?;

        Ok((cancelled, amount, tier))
    }

    pub async fn get_reservation(&self, id: Uuid) -> Result<Reservation, AppError> {
        self.reservation_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ReservationNotFound)
    }

    pub async fn list_user_reservations(&self, user_id: Uuid) -> Result<Vec<Reservation>, AppError> {
        self.reservation_repo.list_by_user(user_id).await
    }

    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, AppError> {
        self.reservation_repo.list_by_date(date).await
    }

    pub async fn update_note(
        &self,
        reservation_id: Uuid,
        note: Option<&str>,
    ) -> Result<Reservation, AppError> {
        self.reservation_repo
            .update_note(&self.pool, reservation_id, note)
            .await?
            .ok_or(AppError::ReservationNotFound)
    }

    /// Uma identidade de unidade reservável, dois caminhos de
    /// construção: reusa o slot vivo em (data, horário) ou materializa
    /// um UNLOCKED na hora para o candidato derivado de regra.
    async fn resolve_bookable_slot(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Slot, AppError> {
        if let Some(existing) = self.slot_repo.find_alive_at(&mut **tx, date, start_time).await? {
            return match existing.status {
                SlotStatus::Unlocked => Ok(existing),
                SlotStatus::Reserved => Err(AppError::SlotAlreadyBooked),
                SlotStatus::Locked | SlotStatus::Blocked => Err(AppError::SlotNotBookable),
            };
        }

        let duration = (end_time - start_time).num_minutes() as i32;

        match self
            .slot_repo
            .insert_if_absent(
                &mut **tx,
                date,
                start_time,
                end_time,
                duration,
                SlotStatus::Unlocked,
                None,
            )
            .await?
        {
            Some(created) => Ok(created),
            // Perdemos a corrida de materialização para outra requisição;
            // o slot agora existe, recomeça pela leitura.
            None => {
                let existing = self
                    .slot_repo
                    .find_alive_at(&mut **tx, date, start_time)
                    .await?
                    .ok_or(AppError::SlotNotFound)?;
                match existing.status {
                    SlotStatus::Unlocked => Ok(existing),
                    SlotStatus::Reserved => Err(AppError::SlotAlreadyBooked),
                    SlotStatus::Locked | SlotStatus::Blocked => Err(AppError::SlotNotBookable),
                }
            }
        }
    }
}
