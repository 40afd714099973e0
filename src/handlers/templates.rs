// src/handlers/templates.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::scheduling::{Slot, SlotTemplate, TemplateSlot},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTemplatePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/api/admin/templates",
    request_body = CreateTemplatePayload,
    responses((status = 201, body = SlotTemplate)),
    security(("api_jwt" = [])),
    tag = "Templates"
)]
pub async fn create_template(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateTemplatePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let template = app_state.template_service.create_template(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    get,
    path = "/api/admin/templates",
    responses((status = 200, body = Vec<SlotTemplate>)),
    security(("api_jwt" = [])),
    tag = "Templates"
)]
pub async fn list_templates(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let templates = app_state.template_service.list_templates().await?;
    Ok((StatusCode::OK, Json(templates)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTemplateSlotPayload {
    #[validate(range(min = 1, max = 7, message = "Dia da semana vai de 1 (segunda) a 7 (domingo)."))]
    pub day_of_week: i32,

    #[schema(value_type = String, format = "time", example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, format = "time", example = "10:00:00")]
    pub end_time: NaiveTime,

    #[validate(range(min = 1, message = "A duração precisa ser positiva."))]
    pub duration_minutes: i32,
}

#[utoipa::path(
    post,
    path = "/api/admin/templates/{id}/slots",
    params(("id" = Uuid, Path, description = "ID do template")),
    request_body = AddTemplateSlotPayload,
    responses((status = 201, body = TemplateSlot)),
    security(("api_jwt" = [])),
    tag = "Templates"
)]
pub async fn add_template_slot(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddTemplateSlotPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if payload.start_time >= payload.end_time {
        return Err(AppError::InvalidInput(
            "O horário inicial precisa ser anterior ao final.".to_string(),
        ));
    }

    let slot = app_state
        .template_service
        .add_template_slot(
            id,
            payload.day_of_week,
            payload.start_time,
            payload.end_time,
            payload.duration_minutes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(slot)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplatePayload {
    // Qualquer dia da semana alvo; normalizamos para a segunda-feira.
    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub week_start: NaiveDate,
}

// Reaplicar o mesmo template à mesma semana é seguro: horários que já
// têm slot são pulados e a resposta traz só o que foi criado agora.
#[utoipa::path(
    post,
    path = "/api/admin/templates/{id}/apply",
    params(("id" = Uuid, Path, description = "ID do template")),
    request_body = ApplyTemplatePayload,
    responses(
        (status = 201, description = "Slots recém-criados", body = Vec<Slot>),
        (status = 404, description = "Template não encontrado")
    ),
    security(("api_jwt" = [])),
    tag = "Templates"
)]
pub async fn apply_template(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyTemplatePayload>,
) -> Result<impl IntoResponse, AppError> {
    let created = app_state
        .template_service
        .apply_template(id, payload.week_start)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
