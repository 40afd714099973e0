// src/handlers/rules.rs

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
    middleware::auth::AuthenticatedUser,
    models::availability::AvailabilityRule,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRulePayload {
    pub name: Option<String>,

    // 1 = Segunda ... 7 = Domingo. Vazio só é válido em regra pontual.
    #[serde(default)]
    #[schema(example = json!([1, 3, 5]))]
    pub days_of_week: Vec<i32>,

    #[schema(value_type = String, format = "time", example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, format = "time", example = "12:00:00")]
    pub end_time: NaiveTime,

    #[validate(range(min = 1, message = "A duração precisa ser positiva."))]
    pub slot_duration_minutes: i32,

    #[serde(default = "default_recurring")]
    pub is_recurring: bool,

    #[schema(value_type = Option<String>, format = Date)]
    pub specific_date: Option<NaiveDate>,

    #[serde(default)]
    pub is_blocked: bool,
}

fn default_recurring() -> bool {
    true
}

#[utoipa::path(
    post,
    path = "/api/admin/availability-rules",
    request_body = CreateRulePayload,
    responses((status = 201, body = AvailabilityRule)),
    security(("api_jwt" = [])),
    tag = "Availability"
)]
pub async fn create_rule(
    State(app_state): State<AppState>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Json(payload): Json<CreateRulePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let rule = app_state
        .availability_service
        .create_rule(
            &app_state.db_pool,
            Some(admin.id),
            payload.name.as_deref(),
            &payload.days_of_week,
            payload.start_time,
            payload.end_time,
            payload.slot_duration_minutes,
            payload.is_recurring,
            payload.specific_date,
            payload.is_blocked,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(rule)))
}

#[utoipa::path(
    get,
    path = "/api/admin/availability-rules",
    responses((status = 200, body = Vec<AvailabilityRule>)),
    security(("api_jwt" = [])),
    tag = "Availability"
)]
pub async fn list_rules(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rules = app_state.availability_service.list_rules().await?;
    Ok((StatusCode::OK, Json(rules)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/availability-rules/{id}",
    params(("id" = Uuid, Path, description = "ID da regra")),
    responses(
        (status = 204, description = "Removida"),
        (status = 404, description = "Regra não encontrada")
    ),
    security(("api_jwt" = [])),
    tag = "Availability"
)]
pub async fn delete_rule(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.availability_service.delete_rule(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
