// src/handlers/credits.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::credits::CreditTransaction,
};

// ---
// Handler: saldo do próprio usuário
// ---
#[utoipa::path(
    get,
    path = "/api/credits/balance",
    responses((status = 200, description = "Saldo atual")),
    security(("api_jwt" = [])),
    tag = "Credits"
)]
pub async fn get_balance(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let balance = app_state.credit_service.balance_of(user.id).await?;
    Ok((StatusCode::OK, Json(json!({ "credits": balance }))))
}

// ---
// Handler: extrato do próprio usuário
// ---
#[utoipa::path(
    get,
    path = "/api/credits/transactions",
    responses((status = 200, body = Vec<CreditTransaction>)),
    security(("api_jwt" = [])),
    tag = "Credits"
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let transactions = app_state.credit_service.transactions_of(user.id).await?;
    Ok((StatusCode::OK, Json(transactions)))
}

// ---
// Payload: webhook do gateway de pagamento
// ---
// O gateway só nos conta o desfecho: "pagamento aprovado, credite N".
// Autenticação do webhook (assinatura etc.) fica no gateway/proxy.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWebhookPayload {
    pub user_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade de créditos deve ser positiva."))]
    pub credits: i32,

    // Identificador do pagamento no gateway, para conciliação.
    pub payment_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/webhooks/payment",
    request_body = PaymentWebhookPayload,
    responses(
        (status = 201, body = CreditTransaction),
        (status = 404, description = "Usuário não encontrado")
    ),
    tag = "Credits"
)]
pub async fn payment_webhook(
    State(app_state): State<AppState>,
    Json(payload): Json<PaymentWebhookPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entry = app_state
        .credit_service
        .register_purchase(payload.user_id, payload.credits, payload.payment_id)
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

// ---
// Payload: ajuste manual do admin
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAdjustPayload {
    pub user_id: Uuid,

    // Positivo credita, negativo debita.
    pub amount: i32,

    #[validate(length(min = 1, message = "A justificativa é obrigatória."))]
    pub note: String,
}

#[utoipa::path(
    post,
    path = "/api/admin/credits/adjust",
    request_body = AdminAdjustPayload,
    responses(
        (status = 201, body = CreditTransaction),
        (status = 402, description = "Débito deixaria o saldo negativo")
    ),
    security(("api_jwt" = [])),
    tag = "Admin"
)]
pub async fn admin_adjust_credits(
    State(app_state): State<AppState>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Json(payload): Json<AdminAdjustPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entry = app_state
        .credit_service
        .admin_adjust(admin.id, payload.user_id, payload.amount, &payload.note)
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}
