// src/models/policy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Política de cancelamento do treinador. Criada sob demanda com os
// padrões (reembolso integral até 24h antes) no primeiro acesso.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicy {
    pub id: Uuid,
    pub trainer_id: Uuid,

    #[schema(example = 24)]
    pub full_refund_hours: i32,

    // Faixa parcial é opcional; só vale quando AMBOS os campos existem.
    #[schema(example = 12)]
    pub partial_refund_hours: Option<i32>,
    #[schema(example = 50)]
    pub partial_refund_percentage: Option<i32>,

    #[schema(example = 0)]
    pub no_refund_hours: i32,

    pub is_active: bool,

    pub updated_at: DateTime<Utc>,
}

// A faixa nomeada em que o cancelamento caiu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundTier {
    NoPolicy,
    FullRefund,
    PartialRefund,
    NoRefund,
}

// Prévia de reembolso para o cliente decidir se cancela.
// Sem efeito colateral algum; pode ser chamada quantas vezes quiser.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefundPreview {
    pub reservation_id: Uuid,
    #[schema(example = 18.5)]
    pub hours_until: f64,
    #[schema(example = 50)]
    pub percentage: i32,
    pub tier: RefundTier,
    #[schema(example = 1)]
    pub credits_used: i32,
    #[schema(example = 0)]
    pub refund_amount: i32,
}
