// src/handlers/slots.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::scheduling::{Slot, SlotStatus},
};

// ---
// Payload: criação ad hoc de slot
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotPayload {
    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub date: NaiveDate,

    #[schema(value_type = String, format = "time", example = "09:00:00")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, format = "time", example = "10:00:00")]
    pub end_time: NaiveTime,

    // Nasce LOCKED por padrão, igual aos slots vindos de template.
    pub status: Option<SlotStatus>,

    #[validate(length(max = 500, message = "A observação pode ter no máximo 500 caracteres."))]
    pub note: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/admin/slots",
    request_body = CreateSlotPayload,
    responses(
        (status = 201, body = Slot),
        (status = 409, description = "Já existe slot em (data, horário)")
    ),
    security(("api_jwt" = [])),
    tag = "Slots"
)]
pub async fn create_slot(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateSlotPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if payload.start_time >= payload.end_time {
        return Err(AppError::InvalidInput(
            "O horário inicial precisa ser anterior ao final.".to_string(),
        ));
    }

    let slot = app_state
        .slot_service
        .create_slot(
            payload.date,
            payload.start_time,
            payload.end_time,
            payload.status.unwrap_or(SlotStatus::Locked),
            payload.note.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(slot)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SlotRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/admin/slots",
    params(SlotRangeQuery),
    responses((status = 200, body = Vec<Slot>)),
    security(("api_jwt" = [])),
    tag = "Slots"
)]
pub async fn list_slots(
    State(app_state): State<AppState>,
    Query(query): Query<SlotRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    if query.from > query.to {
        return Err(AppError::InvalidInput(
            "O início do intervalo precisa ser anterior ao fim.".to_string(),
        ));
    }

    let slots = app_state.slot_service.list_slots(query.from, query.to).await?;
    Ok((StatusCode::OK, Json(slots)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeSlotStatusPayload {
    pub status: SlotStatus,
}

#[utoipa::path(
    patch,
    path = "/api/admin/slots/{id}/status",
    params(("id" = Uuid, Path, description = "ID do slot")),
    request_body = ChangeSlotStatusPayload,
    responses(
        (status = 200, body = Slot),
        (status = 409, description = "Slot com reserva confirmada vinculada")
    ),
    security(("api_jwt" = [])),
    tag = "Slots"
)]
pub async fn change_slot_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeSlotStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let slot = app_state.slot_service.change_status(id, payload.status).await?;
    Ok((StatusCode::OK, Json(slot)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/slots/{id}",
    params(("id" = Uuid, Path, description = "ID do slot")),
    responses(
        (status = 204, description = "Removido"),
        (status = 409, description = "Slot RESERVED não pode ser removido")
    ),
    security(("api_jwt" = [])),
    tag = "Slots"
)]
pub async fn delete_slot(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.slot_service.delete_slot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Desbloqueio em massa da semana
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnlockWeekPayload {
    // Qualquer dia serve; normalizamos para a segunda-feira da semana.
    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub week_start: NaiveDate,
}

#[utoipa::path(
    post,
    path = "/api/admin/weeks/unlock",
    request_body = UnlockWeekPayload,
    responses((status = 200, description = "Quantidade de slots desbloqueados")),
    security(("api_jwt" = [])),
    tag = "Slots"
)]
pub async fn unlock_week(
    State(app_state): State<AppState>,
    Json(payload): Json<UnlockWeekPayload>,
) -> Result<impl IntoResponse, AppError> {
    let affected = app_state.template_service.unlock_week(payload.week_start).await?;
    Ok((StatusCode::OK, Json(json!({ "unlocked": affected }))))
}
