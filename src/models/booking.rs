// src/models/booking.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

// Uma reserva nunca é apagada: cancelamento é transição de estado,
// para que o histórico e o livro-razão continuem fazendo sentido.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Option<Uuid>,

    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = "time", example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, format = "time", example = "10:00:00")]
    pub end_time: NaiveTime,

    pub status: ReservationStatus,

    #[schema(example = 1)]
    pub credits_used: i32,

    pub pricing_item_id: Option<Uuid>,
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

// Decisão de reembolso tomada ANTES de executar o cancelamento.
// O chamador escolhe o caminho: nada, integral, ou um valor já
// calculado (pela política ou por julgamento do admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundDecision {
    None,
    Full,
    Amount(i32),
}

impl RefundDecision {
    /// Resolve a decisão em créditos a devolver para uma reserva concreta.
    pub fn credits_for(&self, credits_used: i32) -> i32 {
        match self {
            RefundDecision::None => 0,
            RefundDecision::Full => credits_used,
            // Nunca devolve mais do que foi debitado.
            RefundDecision::Amount(n) => (*n).clamp(0, credits_used),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refund_decision_resolves_credits() {
        assert_eq!(RefundDecision::None.credits_for(3), 0);
        assert_eq!(RefundDecision::Full.credits_for(3), 3);
        assert_eq!(RefundDecision::Amount(2).credits_for(3), 2);
    }

    #[test]
    fn refund_amount_is_clamped_to_what_was_debited() {
        assert_eq!(RefundDecision::Amount(10).credits_for(3), 3);
        assert_eq!(RefundDecision::Amount(-1).credits_for(3), 0);
    }
}
