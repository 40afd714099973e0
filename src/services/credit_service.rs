// src/services/credit_service.rs

use std::sync::Arc;

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CreditRepository, UserRepository},
    models::credits::{CreditTransaction, CreditTransactionKind},
    services::audit::{AuditEvent, AuditSink},
};

// Operações de saldo fora do fluxo de reserva: compra (webhook de
// pagamento) e ajuste manual do admin. A regra é uma só — delta
// atômico no usuário e lançamento no razão, na mesma transação.
#[derive(Clone)]
pub struct CreditService {
    user_repo: UserRepository,
    credit_repo: CreditRepository,
    audit: Arc<dyn AuditSink>,
    pool: PgPool,
}

impl CreditService {
    pub fn new(
        user_repo: UserRepository,
        credit_repo: CreditRepository,
        audit: Arc<dyn AuditSink>,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, credit_repo, audit, pool }
    }

    /// "Pagamento confirmado, credite N" — é só isso que o gateway nos
    /// diz. `reference_id` carrega o identificador do pagamento para
    /// conciliação.
    pub async fn register_purchase(
        &self,
        user_id: Uuid,
        amount: i32,
        reference_id: Option<Uuid>,
    ) -> Result<CreditTransaction, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidInput(
                "A quantidade de créditos comprados deve ser positiva.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let new_balance = self
            .user_repo
            .adjust_credits(&mut *tx, user_id, amount)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let entry = self
            .credit_repo
            .append(
                &mut *tx,
                user_id,
                amount,
                CreditTransactionKind::Purchase,
                reference_id,
                "Compra de créditos",
            )
            .await?;

        tx.commit().await?;

        tracing::info!("💰 Usuário {} comprou {} créditos (saldo: {})", user_id, amount, new_balance);
        Ok(entry)
    }

    /// Ajuste manual, positivo ou negativo. Débitos usam o mesmo UPDATE
    /// condicionado das reservas: o saldo nunca fica negativo, nem com
    /// admin apressado.
    pub async fn admin_adjust(
        &self,
        admin_id: Uuid,
        user_id: Uuid,
        amount: i32,
        note: &str,
    ) -> Result<CreditTransaction, AppError> {
        if amount == 0 {
            return Err(AppError::InvalidInput(
                "O ajuste precisa ser diferente de zero.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let new_balance = self
            .user_repo
            .adjust_credits(&mut *tx, user_id, amount)
            .await?
            .ok_or(AppError::InsufficientCredits)?;

        let entry = self
            .credit_repo
            .append(
                &mut *tx,
                user_id,
                amount,
                CreditTransactionKind::AdminAdjustment,
                None,
                note,
            )
            .await?;

        tx.commit().await?;

        self.audit.publish(AuditEvent {
            actor: Some(admin_id),
            action: "credits.adjust",
            target: user_id,
            before: json!({ "credits": user.credits }),
            after: json!({ "credits": new_balance, "note": note }),
        });

        Ok(entry)
    }

    pub async fn balance_of(&self, user_id: Uuid) -> Result<i32, AppError> {
        let user = self
            .user_repo
            .find_by_id(&self.pool, user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        Ok(user.credits)
    }

    pub async fn transactions_of(&self, user_id: Uuid) -> Result<Vec<CreditTransaction>, AppError> {
        self.credit_repo.list_by_user(user_id).await
    }
}
