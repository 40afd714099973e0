// src/services/policy_service.rs

use chrono::Local;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, time::hours_until},
    db::{PolicyRepository, ReservationRepository},
    models::policy::{CancellationPolicy, RefundPreview, RefundTier},
};

// Motor de política de cancelamento. O coração é `refund_tier`, uma
// função pura sem efeito colateral — segura para chamar quantas vezes
// o front quiser exibir a prévia.
#[derive(Clone)]
pub struct PolicyService {
    policy_repo: PolicyRepository,
    reservation_repo: ReservationRepository,
    pool: PgPool,
}

impl PolicyService {
    pub fn new(
        policy_repo: PolicyRepository,
        reservation_repo: ReservationRepository,
        pool: PgPool,
    ) -> Self {
        Self { policy_repo, reservation_repo, pool }
    }

    pub async fn get_policy(&self, trainer_id: Uuid) -> Result<CancellationPolicy, AppError> {
        // Criada sob demanda com os padrões no primeiro acesso.
        self.policy_repo.get_or_create_default(trainer_id).await
    }

    pub async fn update_policy(
        &self,
        trainer_id: Uuid,
        full_refund_hours: i32,
        partial_refund_hours: Option<i32>,
        partial_refund_percentage: Option<i32>,
        no_refund_hours: i32,
        is_active: bool,
    ) -> Result<CancellationPolicy, AppError> {
        self.policy_repo
            .upsert(
                &self.pool,
                trainer_id,
                full_refund_hours,
                partial_refund_hours,
                partial_refund_percentage,
                no_refund_hours,
                is_active,
            )
            .await
    }

    /// Prévia de reembolso de uma reserva, com a política ativa e o
    /// relógio local de agora.
    pub async fn refund_preview(&self, reservation_id: Uuid) -> Result<RefundPreview, AppError> {
        let reservation = self
            .reservation_repo
            .find_by_id(&self.pool, reservation_id)
            .await?
            .ok_or(AppError::ReservationNotFound)?;

        let policy = self.policy_repo.find_active().await?;
        let now = Local::now().naive_local();
        let hours = hours_until(now, reservation.date, reservation.start_time);

        let (percentage, tier) = refund_tier(policy.as_ref(), hours);
        let refund_amount = refund_amount(reservation.credits_used, percentage);

        Ok(RefundPreview {
            reservation_id,
            hours_until: hours,
            percentage,
            tier,
            credits_used: reservation.credits_used,
            refund_amount,
        })
    }

    /// Quantos créditos a política manda devolver se o cliente cancelar
    /// agora. Usado pelo caminho de cancelamento self-service.
    pub async fn policy_refund_for(
        &self,
        credits_used: i32,
        hours: f64,
    ) -> Result<(i32, RefundTier), AppError> {
        let policy = self.policy_repo.find_active().await?;
        let (percentage, tier) = refund_tier(policy.as_ref(), hours);
        Ok((refund_amount(credits_used, percentage), tier))
    }
}

/// (percentual, faixa) do reembolso em função do tempo até a sessão.
///
/// Sem política ativa, o negócio não impôs regra nenhuma: devolve tudo.
pub fn refund_tier(policy: Option<&CancellationPolicy>, hours_until: f64) -> (i32, RefundTier) {
    let policy = match policy {
        Some(p) if p.is_active => p,
        _ => return (100, RefundTier::NoPolicy),
    };

    if hours_until >= policy.full_refund_hours as f64 {
        return (100, RefundTier::FullRefund);
    }

    // A faixa parcial só existe quando AMBOS os campos foram configurados.
    if let (Some(partial_hours), Some(percentage)) =
        (policy.partial_refund_hours, policy.partial_refund_percentage)
    {
        if hours_until >= partial_hours as f64 {
            return (percentage, RefundTier::PartialRefund);
        }
    }

    (0, RefundTier::NoRefund)
}

/// floor(creditsUsed * percentual / 100) — créditos são inteiros, a
/// fração é sempre para baixo.
pub fn refund_amount(credits_used: i32, percentage: i32) -> i32 {
    (credits_used * percentage) / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn policy(
        full: i32,
        partial_hours: Option<i32>,
        partial_pct: Option<i32>,
        active: bool,
    ) -> CancellationPolicy {
        CancellationPolicy {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            full_refund_hours: full,
            partial_refund_hours: partial_hours,
            partial_refund_percentage: partial_pct,
            no_refund_hours: 0,
            is_active: active,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn no_active_policy_refunds_everything() {
        assert_eq!(refund_tier(None, 1.0), (100, RefundTier::NoPolicy));

        let inactive = policy(24, None, None, false);
        assert_eq!(refund_tier(Some(&inactive), 1.0), (100, RefundTier::NoPolicy));
    }

    #[test]
    fn standard_three_tier_policy() {
        let p = policy(24, Some(12), Some(50), true);

        assert_eq!(refund_tier(Some(&p), 30.0), (100, RefundTier::FullRefund));
        assert_eq!(refund_tier(Some(&p), 18.0), (50, RefundTier::PartialRefund));
        assert_eq!(refund_tier(Some(&p), 5.0), (0, RefundTier::NoRefund));
    }

    #[test]
    fn boundary_hours_count_as_the_more_generous_tier() {
        let p = policy(24, Some(12), Some(50), true);
        assert_eq!(refund_tier(Some(&p), 24.0), (100, RefundTier::FullRefund));
        assert_eq!(refund_tier(Some(&p), 12.0), (50, RefundTier::PartialRefund));
    }

    #[test]
    fn partial_tier_needs_both_fields() {
        let only_hours = policy(24, Some(12), None, true);
        assert_eq!(refund_tier(Some(&only_hours), 18.0), (0, RefundTier::NoRefund));

        let only_pct = policy(24, None, Some(50), true);
        assert_eq!(refund_tier(Some(&only_pct), 18.0), (0, RefundTier::NoRefund));
    }

    #[test]
    fn past_sessions_never_refund_under_a_policy() {
        let p = policy(24, Some(12), Some(50), true);
        assert_eq!(refund_tier(Some(&p), -2.0), (0, RefundTier::NoRefund));
    }

    #[test]
    fn refund_amount_floors_the_fraction() {
        assert_eq!(refund_amount(1, 50), 0); // floor(0.5)
        assert_eq!(refund_amount(3, 50), 1); // floor(1.5)
        assert_eq!(refund_amount(4, 100), 4);
        assert_eq!(refund_amount(4, 0), 0);
    }
}
