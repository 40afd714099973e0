// src/handlers/policy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::policy::CancellationPolicy,
};

// GET cria a política com os padrões no primeiro acesso — o admin nunca
// vê 404 aqui.
#[utoipa::path(
    get,
    path = "/api/admin/policy",
    responses((status = 200, body = CancellationPolicy)),
    security(("api_jwt" = [])),
    tag = "Policy"
)]
pub async fn get_policy(
    State(app_state): State<AppState>,
    AuthenticatedUser(admin): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let policy = app_state.policy_service.get_policy(admin.id).await?;
    Ok((StatusCode::OK, Json(policy)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyPayload {
    #[validate(range(min = 0, message = "Horas não podem ser negativas."))]
    pub full_refund_hours: i32,

    pub partial_refund_hours: Option<i32>,

    #[validate(range(min = 0, max = 100, message = "O percentual vai de 0 a 100."))]
    pub partial_refund_percentage: Option<i32>,

    #[validate(range(min = 0, message = "Horas não podem ser negativas."))]
    pub no_refund_hours: i32,

    pub is_active: bool,
}

impl UpdatePolicyPayload {
    fn validate_consistency(&self) -> Result<(), AppError> {
        // Faixa parcial pela metade só confunde: ou os dois campos, ou nenhum.
        if self.partial_refund_hours.is_some() != self.partial_refund_percentage.is_some() {
            return Err(AppError::InvalidInput(
                "Reembolso parcial exige horas E percentual (ou nenhum dos dois).".to_string(),
            ));
        }
        if let Some(partial) = self.partial_refund_hours {
            if partial < 0 || partial > self.full_refund_hours {
                return Err(AppError::InvalidInput(
                    "As horas do reembolso parcial precisam estar entre 0 e as do integral.".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[utoipa::path(
    put,
    path = "/api/admin/policy",
    request_body = UpdatePolicyPayload,
    responses((status = 200, body = CancellationPolicy)),
    security(("api_jwt" = [])),
    tag = "Policy"
)]
pub async fn update_policy(
    State(app_state): State<AppState>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Json(payload): Json<UpdatePolicyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    payload.validate_consistency()?;

    let policy = app_state
        .policy_service
        .update_policy(
            admin.id,
            payload.full_refund_hours,
            payload.partial_refund_hours,
            payload.partial_refund_percentage,
            payload.no_refund_hours,
            payload.is_active,
        )
        .await?;

    Ok((StatusCode::OK, Json(policy)))
}
