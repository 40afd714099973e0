// src/models/scheduling.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

// Máquina de estados do slot:
//   LOCKED   -> retido pelo admin, invisível para reserva
//   UNLOCKED -> aberto para reserva assistida
//   RESERVED -> ocupado por uma reserva confirmada
//   BLOCKED  -> explicitamente indisponível, independente de reservas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "slot_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Locked,
    Unlocked,
    Reserved,
    Blocked,
}

// --- Structs ---

// A unidade reservável CONCRETA e endereçável. Uma reserva sempre
// aponta para uma linha desta tabela, não para uma regra abstrata.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub date: NaiveDate,

    #[schema(value_type = String, format = "time", example = "09:00:00")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, format = "time", example = "10:00:00")]
    pub end_time: NaiveTime,

    #[schema(example = 60)]
    pub duration_minutes: i32,

    pub status: SlotStatus,

    pub assigned_user_id: Option<Uuid>,

    // Rastreabilidade: de qual template esse slot nasceu (se nasceu de um).
    pub template_id: Option<Uuid>,

    pub note: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
}

// Um template é um padrão semanal reutilizável. Aplicá-lo a uma semana
// materializa linhas de Slot com status LOCKED.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotTemplate {
    pub id: Uuid,
    #[schema(example = "Semana padrão")]
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSlot {
    pub id: Uuid,
    pub template_id: Uuid,

    // 1 = Segunda ... 7 = Domingo
    #[schema(example = 1)]
    pub day_of_week: i32,

    #[schema(value_type = String, format = "time", example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, format = "time", example = "10:00:00")]
    pub end_time: NaiveTime,

    #[schema(example = 60)]
    pub duration_minutes: i32,
}
