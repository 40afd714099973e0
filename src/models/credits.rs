// src/models/credits.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "credit_transaction_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditTransactionKind {
    Purchase,
    Reservation,
    Refund,
    AdminAdjustment,
}

// Uma linha do livro-razão. Append-only: nunca editada, nunca apagada.
// Invariante verificável: sum(amount) por usuário == users.credits.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransaction {
    pub id: Uuid,
    pub user_id: Uuid,

    // Positivo = entrada de créditos, negativo = saída.
    #[schema(example = -1)]
    pub amount: i32,

    pub kind: CreditTransactionKind,

    // Reserva, cancelamento ou pagamento que originou o lançamento.
    pub reference_id: Option<Uuid>,

    pub note: String,

    pub created_at: DateTime<Utc>,
}

// Item do catálogo de preços (sistema externo de cobrança; aqui só a
// interface de leitura que o motor de reservas consome).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingItem {
    pub id: Uuid,
    #[schema(example = "Aula avulsa")]
    pub name: String,
    #[schema(example = 1)]
    pub credits: i32,
    pub is_active: bool,
}
