// src/models/reminder.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// O tipo de lembrete É a chave de deduplicação junto com a reserva.
// Guardado como texto ("24h" / "1h") para o registro ser legível no banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ReminderType {
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[serde(rename = "1h")]
    OneHour,
}

impl ReminderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderType::TwentyFourHours => "24h",
            ReminderType::OneHour => "1h",
        }
    }
}

// Registro de envio, gravado ANTES do disparo do e-mail. Se o processo
// cair entre a gravação e o envio, perdemos um lembrete; nunca enviamos
// dois. Para este domínio, duplicar é pior do que ocasionalmente faltar.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSentRecord {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "24h")]
    pub reminder_type: String,
    pub sent_at: DateTime<Utc>,
}
