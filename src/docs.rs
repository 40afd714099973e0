// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Availability ---
        handlers::availability::get_available_slots,
        handlers::rules::create_rule,
        handlers::rules::list_rules,
        handlers::rules::delete_rule,

        // --- Reservations ---
        handlers::reservations::create_reservation,
        handlers::reservations::list_my_reservations,
        handlers::reservations::cancel_my_reservation,
        handlers::reservations::refund_preview,
        handlers::reservations::admin_create_reservation,
        handlers::reservations::admin_cancel_reservation,
        handlers::reservations::admin_list_reservations,
        handlers::reservations::admin_update_note,
        handlers::reservations::admin_send_reminder,

        // --- Slots ---
        handlers::slots::create_slot,
        handlers::slots::list_slots,
        handlers::slots::change_slot_status,
        handlers::slots::delete_slot,
        handlers::slots::unlock_week,

        // --- Templates ---
        handlers::templates::create_template,
        handlers::templates::list_templates,
        handlers::templates::add_template_slot,
        handlers::templates::apply_template,

        // --- Credits ---
        handlers::credits::get_balance,
        handlers::credits::list_transactions,
        handlers::credits::payment_webhook,
        handlers::credits::admin_adjust_credits,

        // --- Policy ---
        handlers::policy::get_policy,
        handlers::policy::update_policy,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Availability ---
            models::availability::AvailabilityRule,
            models::availability::AvailableSlot,

            // --- Scheduling ---
            models::scheduling::SlotStatus,
            models::scheduling::Slot,
            models::scheduling::SlotTemplate,
            models::scheduling::TemplateSlot,

            // --- Booking ---
            models::booking::ReservationStatus,
            models::booking::Reservation,

            // --- Credits ---
            models::credits::CreditTransactionKind,
            models::credits::CreditTransaction,
            models::credits::PricingItem,

            // --- Policy ---
            models::policy::CancellationPolicy,
            models::policy::RefundTier,
            models::policy::RefundPreview,

            // --- Reminder ---
            models::reminder::ReminderType,
            models::reminder::ReminderSentRecord,

            // --- Payloads ---
            handlers::reservations::CreateReservationPayload,
            handlers::reservations::AdminCreateReservationPayload,
            handlers::reservations::AdminCancelPayload,
            handlers::reservations::UpdateNotePayload,
            handlers::slots::CreateSlotPayload,
            handlers::slots::ChangeSlotStatusPayload,
            handlers::slots::UnlockWeekPayload,
            handlers::templates::CreateTemplatePayload,
            handlers::templates::AddTemplateSlotPayload,
            handlers::templates::ApplyTemplatePayload,
            handlers::credits::PaymentWebhookPayload,
            handlers::credits::AdminAdjustPayload,
            handlers::policy::UpdatePolicyPayload,
            handlers::rules::CreateRulePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Availability", description = "Regras e candidatos de disponibilidade"),
        (name = "Reservations", description = "Reservas e cancelamentos"),
        (name = "Slots", description = "Estoque de horários (admin)"),
        (name = "Templates", description = "Padrões semanais de agenda"),
        (name = "Credits", description = "Saldo, extrato e compras de créditos"),
        (name = "Policy", description = "Política de cancelamento"),
        (name = "Admin", description = "Operações administrativas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
