// src/models/availability.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Uma regra de disponibilidade é o padrão ABSTRATO (semanal ou de data
// específica) de quando é possível reservar. Ela nunca é reservada
// diretamente: o motor de disponibilidade a expande em candidatos.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRule {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub name: Option<String>,

    // 1 = Segunda ... 7 = Domingo
    #[schema(example = json!([1, 3, 5]))]
    pub days_of_week: Vec<i32>,

    #[schema(value_type = String, format = "time", example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, format = "time", example = "12:00:00")]
    pub end_time: NaiveTime,

    #[schema(example = 60)]
    pub slot_duration_minutes: i32,

    pub is_recurring: bool,

    // Override pontual: quando setado, a regra vale só para esse dia.
    #[schema(value_type = Option<String>, format = Date)]
    pub specific_date: Option<NaiveDate>,

    // true = a regra SUBTRAI disponibilidade (bloqueio) em vez de somar.
    pub is_blocked: bool,

    pub created_at: DateTime<Utc>,
}

// Um candidato efêmero produzido pela expansão das regras.
// Não existe como linha no banco; vira um Slot de verdade apenas
// no momento em que alguém o reserva.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot {
    pub rule_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = "time", example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, format = "time", example = "10:00:00")]
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
}

// Faixa bloqueada já reduzida ao que o algoritmo precisa.
#[derive(Debug, Clone, Copy)]
pub struct BlockedRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}
