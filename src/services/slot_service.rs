// src/services/slot_service.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SlotRepository,
    models::scheduling::{Slot, SlotStatus},
};

// Administração direta do estoque de slots: criação ad hoc, listagem,
// transições manuais e remoção. As transições que envolvem reserva
// (UNLOCKED -> RESERVED e a volta) pertencem ao motor de reservas e
// não passam por aqui.
#[derive(Clone)]
pub struct SlotService {
    slot_repo: SlotRepository,
    pool: PgPool,
}

impl SlotService {
    pub fn new(slot_repo: SlotRepository, pool: PgPool) -> Self {
        Self { slot_repo, pool }
    }

    pub async fn create_slot(
        &self,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        status: SlotStatus,
        note: Option<&str>,
    ) -> Result<Slot, AppError> {
        if status == SlotStatus::Reserved {
            return Err(AppError::InvalidInput(
                "Um slot não pode nascer RESERVED; reserve-o pelo fluxo de reservas.".to_string(),
            ));
        }

        let duration = (end_time - start_time).num_minutes() as i32;

        self.slot_repo
            .create(&self.pool, date, start_time, end_time, duration, status, None, note)
            .await
    }

    pub async fn list_slots(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Slot>, AppError> {
        self.slot_repo.list_range(from, to).await
    }

    /// Transição manual de status. Recusa:
    ///   - transições fora da máquina de estados;
    ///   - mexer em slot com reserva confirmada vinculada (a edição
    ///     deixaria a reserva órfã — quem resolve isso é o cancelamento).
    pub async fn change_status(&self, slot_id: Uuid, to: SlotStatus) -> Result<Slot, AppError> {
        let mut tx = self.pool.begin().await?;

        let slot = self
            .slot_repo
            .find_by_id(&mut *tx, slot_id)
            .await?
            .ok_or(AppError::SlotNotFound)?;

        if self.slot_repo.has_confirmed_reservation(&mut *tx, slot_id).await? {
            return Err(AppError::SlotHasReservation);
        }

        if !admin_transition_allowed(slot.status, to) {
            return Err(AppError::InvalidInput(format!(
                "Transição de {:?} para {:?} não é permitida.",
                slot.status, to
            )));
        }

        let updated = self
            .slot_repo
            .set_status(&mut *tx, slot_id, to)
            .await?
            .ok_or(AppError::SlotNotFound)?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Soft delete. Slot RESERVED não sai do estoque.
    pub async fn delete_slot(&self, slot_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let slot = self
            .slot_repo
            .find_by_id(&mut *tx, slot_id)
            .await?
            .ok_or(AppError::SlotNotFound)?;

        if slot.status == SlotStatus::Reserved {
            return Err(AppError::SlotHasReservation);
        }

        let deleted = self.slot_repo.soft_delete(&mut *tx, slot_id).await?;
        if !deleted {
            // Alguém reservou entre a leitura e o delete.
            return Err(AppError::SlotHasReservation);
        }

        tx.commit().await?;
        Ok(())
    }
}

/// A parte da máquina de estados que o admin opera à mão:
///   LOCKED -> UNLOCKED (abrir a agenda)
///   UNLOCKED <-> BLOCKED (indisponibilidade explícita)
/// RESERVED só entra e sai pelo motor de reservas.
pub fn admin_transition_allowed(from: SlotStatus, to: SlotStatus) -> bool {
    matches!(
        (from, to),
        (SlotStatus::Locked, SlotStatus::Unlocked)
            | (SlotStatus::Unlocked, SlotStatus::Blocked)
            | (SlotStatus::Blocked, SlotStatus::Unlocked)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use SlotStatus::*;

    #[test]
    fn allowed_admin_transitions() {
        assert!(admin_transition_allowed(Locked, Unlocked));
        assert!(admin_transition_allowed(Unlocked, Blocked));
        assert!(admin_transition_allowed(Blocked, Unlocked));
    }

    #[test]
    fn reserved_is_untouchable_by_hand() {
        for to in [Locked, Unlocked, Blocked] {
            assert!(!admin_transition_allowed(Reserved, to));
        }
        for from in [Locked, Unlocked, Blocked] {
            assert!(!admin_transition_allowed(from, Reserved));
        }
    }

    #[test]
    fn unlocked_never_goes_back_to_locked() {
        assert!(!admin_transition_allowed(Unlocked, Locked));
        assert!(!admin_transition_allowed(Blocked, Locked));
    }
}
