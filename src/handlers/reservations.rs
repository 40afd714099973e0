// src/handlers/reservations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::booking::{RefundDecision, Reservation},
};

// ---
// Payload: criação self-service
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationPayload {
    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub date: NaiveDate,

    #[schema(value_type = String, format = "time", example = "09:00:00")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, format = "time", example = "10:00:00")]
    pub end_time: NaiveTime,

    // Sem item de preço, a sessão custa o padrão de 1 crédito.
    pub pricing_item_id: Option<Uuid>,
}

impl CreateReservationPayload {
    fn validate_consistency(&self) -> Result<(), AppError> {
        if self.start_time >= self.end_time {
            return Err(AppError::InvalidInput(
                "O horário inicial precisa ser anterior ao final.".to_string(),
            ));
        }
        Ok(())
    }
}

// ---
// Handler: create_reservation (cliente)
// ---
#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = CreateReservationPayload,
    responses(
        (status = 201, description = "Reserva confirmada", body = Reservation),
        (status = 402, description = "Créditos insuficientes"),
        (status = 409, description = "Horário já reservado")
    ),
    security(("api_jwt" = [])),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    payload.validate_consistency()?;

    let reservation = app_state
        .booking_service
        .create_reservation(
            user.id,
            payload.date,
            payload.start_time,
            payload.end_time,
            payload.pricing_item_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

// ---
// Handler: listar as próprias reservas
// ---
#[utoipa::path(
    get,
    path = "/api/reservations",
    responses((status = 200, body = Vec<Reservation>)),
    security(("api_jwt" = [])),
    tag = "Reservations"
)]
pub async fn list_my_reservations(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let reservations = app_state.booking_service.list_user_reservations(user.id).await?;
    Ok((StatusCode::OK, Json(reservations)))
}

// ---
// Handler: cancelamento self-service (reembolso decidido pela política)
// ---
#[utoipa::path(
    post,
    path = "/api/reservations/{id}/cancel",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Cancelada; reembolso conforme a política"),
        (status = 403, description = "A reserva é de outro usuário"),
        (status = 409, description = "Já cancelada")
    ),
    security(("api_jwt" = [])),
    tag = "Reservations"
)]
pub async fn cancel_my_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (reservation, refund_amount, tier) = app_state
        .booking_service
        .cancel_own_with_policy(user.id, id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "reservation": reservation,
            "refundAmount": refund_amount,
            "tier": tier,
        })),
    ))
}

// ---
// Handler: prévia de reembolso (sem efeito colateral)
// ---
#[utoipa::path(
    get,
    path = "/api/reservations/{id}/refund-preview",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses((status = 200, body = crate::models::policy::RefundPreview)),
    security(("api_jwt" = [])),
    tag = "Reservations"
)]
pub async fn refund_preview(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // O cliente só enxerga prévia das próprias reservas.
    let reservation = app_state.booking_service.get_reservation(id).await?;
    if !user.is_admin && reservation.user_id != user.id {
        return Err(AppError::Forbidden);
    }

    let preview = app_state.policy_service.refund_preview(id).await?;

    Ok((StatusCode::OK, Json(preview)))
}

// =========================================================================
//  ROTAS ADMINISTRATIVAS
// =========================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateReservationPayload {
    pub user_id: Uuid,
    pub slot_id: Uuid,

    // true = debita o custo padrão de 1 crédito; false = cortesia.
    #[serde(default)]
    pub deduct_credits: bool,

    #[validate(length(max = 500, message = "A observação pode ter no máximo 500 caracteres."))]
    pub note: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/admin/reservations",
    request_body = AdminCreateReservationPayload,
    responses(
        (status = 201, body = Reservation),
        (status = 409, description = "Slot indisponível")
    ),
    security(("api_jwt" = [])),
    tag = "Admin"
)]
pub async fn admin_create_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Json(payload): Json<AdminCreateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let reservation = app_state
        .booking_service
        .admin_create_reservation(
            admin.id,
            payload.user_id,
            payload.slot_id,
            payload.deduct_credits,
            payload.note.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCancelPayload {
    // Caminho booleano: tudo ou nada.
    #[serde(default)]
    pub refund_credits: bool,

    // Caminho por valor: reembolso parcial explícito. Quando presente,
    // prevalece sobre o booleano.
    pub refund_amount: Option<i32>,
}

#[utoipa::path(
    post,
    path = "/api/admin/reservations/{id}/cancel",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    request_body = AdminCancelPayload,
    responses(
        (status = 200, body = Reservation),
        (status = 409, description = "Já cancelada")
    ),
    security(("api_jwt" = [])),
    tag = "Admin"
)]
pub async fn admin_cancel_reservation(
    State(app_state): State<AppState>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminCancelPayload>,
) -> Result<impl IntoResponse, AppError> {
    let decision = match payload.refund_amount {
        Some(amount) if amount < 0 => {
            return Err(AppError::InvalidInput(
                "O valor de reembolso não pode ser negativo.".to_string(),
            ));
        }
        Some(amount) => RefundDecision::Amount(amount),
        None if payload.refund_credits => RefundDecision::Full,
        None => RefundDecision::None,
    };

    let reservation = app_state
        .booking_service
        .cancel_reservation(None, Some(admin.id), id, decision)
        .await?;

    Ok((StatusCode::OK, Json(reservation)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminReservationsQuery {
    pub date: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/admin/reservations",
    params(AdminReservationsQuery),
    responses((status = 200, body = Vec<Reservation>)),
    security(("api_jwt" = [])),
    tag = "Admin"
)]
pub async fn admin_list_reservations(
    State(app_state): State<AppState>,
    Query(query): Query<AdminReservationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reservations = app_state.booking_service.list_by_date(query.date).await?;
    Ok((StatusCode::OK, Json(reservations)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateNotePayload {
    #[validate(length(max = 500, message = "A observação pode ter no máximo 500 caracteres."))]
    pub note: Option<String>,
}

#[utoipa::path(
    patch,
    path = "/api/admin/reservations/{id}/note",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    request_body = UpdateNotePayload,
    responses((status = 200, body = Reservation)),
    security(("api_jwt" = [])),
    tag = "Admin"
)]
pub async fn admin_update_note(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let reservation = app_state
        .booking_service
        .update_note(id, payload.note.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(reservation)))
}

// Ação manual "enviar lembrete agora", com a mesma deduplicação do
// agendador periódico.
#[utoipa::path(
    post,
    path = "/api/admin/reservations/{id}/remind",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Lembrete disparado"),
        (status = 409, description = "Lembrete já enviado")
    ),
    security(("api_jwt" = [])),
    tag = "Admin"
)]
pub async fn admin_send_reminder(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let now = Local::now().naive_local();
    let reminder_type = app_state.reminder_service.send_manual(id, now).await?;

    Ok((StatusCode::OK, Json(json!({ "reminderType": reminder_type }))))
}
