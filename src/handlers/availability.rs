// src/handlers/availability.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{common::error::AppError, config::AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    /// Data no formato YYYY-MM-DD
    pub date: NaiveDate,
}

// A visão do cliente: candidatos derivados das regras, já descontando
// bloqueios e reservas confirmadas. Dia sem regra = lista vazia.
#[utoipa::path(
    get,
    path = "/api/availability",
    params(AvailabilityQuery),
    responses((status = 200, description = "Candidatos reserváveis do dia")),
    security(("api_jwt" = [])),
    tag = "Availability"
)]
pub async fn get_available_slots(
    State(app_state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let slots = app_state
        .availability_service
        .get_available_slots(query.date)
        .await?;

    Ok((StatusCode::OK, Json(slots)))
}
