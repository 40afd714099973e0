use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// As categorias importam para o front: "Conflict" permite mostrar
// "alguém acabou de reservar este horário" em vez de um erro genérico.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    // --- Não encontrado ---
    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Reserva não encontrada")]
    ReservationNotFound,

    #[error("Slot não encontrado")]
    SlotNotFound,

    #[error("Template não encontrado")]
    TemplateNotFound,

    #[error("Regra de disponibilidade não encontrada")]
    RuleNotFound,

    #[error("Item de preço não encontrado")]
    PricingItemNotFound,

    // --- Conflitos (seguro tentar de novo só depois de reler o estado) ---
    #[error("Horário já reservado")]
    SlotAlreadyBooked,

    #[error("Já existe um slot nessa data e horário")]
    DuplicateSlot,

    #[error("Reserva já cancelada")]
    AlreadyCancelled,

    #[error("O slot não está aberto para reserva")]
    SlotNotBookable,

    #[error("O slot possui uma reserva confirmada vinculada")]
    SlotHasReservation,

    #[error("Lembrete já enviado para essa reserva")]
    ReminderAlreadySent,

    // --- Terminais para a ação tentada ---
    #[error("Créditos insuficientes")]
    InsufficientCredits,

    #[error("Acesso negado")]
    Forbidden,

    // --- Autenticação (ambiente) ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::ReservationNotFound => (StatusCode::NOT_FOUND, "Reserva não encontrada."),
            AppError::SlotNotFound => (StatusCode::NOT_FOUND, "Slot não encontrado."),
            AppError::TemplateNotFound => (StatusCode::NOT_FOUND, "Template não encontrado."),
            AppError::RuleNotFound => (StatusCode::NOT_FOUND, "Regra de disponibilidade não encontrada."),
            AppError::PricingItemNotFound => (StatusCode::NOT_FOUND, "Item de preço não encontrado."),

            AppError::SlotAlreadyBooked => (StatusCode::CONFLICT, "Esse horário acabou de ser reservado por outra pessoa."),
            AppError::DuplicateSlot => (StatusCode::CONFLICT, "Já existe um slot nessa data e horário."),
            AppError::AlreadyCancelled => (StatusCode::CONFLICT, "Essa reserva já foi cancelada."),
            AppError::SlotNotBookable => (StatusCode::CONFLICT, "Esse slot não está aberto para reserva."),
            AppError::SlotHasReservation => (StatusCode::CONFLICT, "Esse slot possui uma reserva confirmada vinculada."),
            AppError::ReminderAlreadySent => (StatusCode::CONFLICT, "O lembrete dessa reserva já foi enviado."),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "Registro duplicado."),

            AppError::InsufficientCredits => (StatusCode::PAYMENT_REQUIRED, "Créditos insuficientes para essa operação."),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Você não tem permissão para essa ação."),

            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Traduz violação de unicidade do Postgres para o erro de domínio certo.
/// O pré-check nos services é cortesia; quem decide é o índice único.
pub fn map_unique_violation(
    err: sqlx::Error,
    constraint_map: &[(&str, fn() -> AppError)],
) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                for (name, make) in constraint_map {
                    if *name == constraint {
                        return make();
                    }
                }
                return AppError::UniqueConstraintViolation(constraint.to_string());
            }
        }
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_unique_errors_pass_through_as_database_error() {
        let err = map_unique_violation(sqlx::Error::RowNotFound, &[]);
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
