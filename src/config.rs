// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AvailabilityRepository, CreditRepository, PolicyRepository, ReminderRepository,
        ReservationRepository, SlotRepository, TemplateRepository, UserRepository,
    },
    services::{
        audit::TracingAuditSink, mailer::LogMailer, AuthService, AvailabilityService,
        BookingService, CreditService, PolicyService, ReminderService, SlotService,
        TemplateService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,

    pub auth_service: AuthService,
    pub availability_service: AvailabilityService,
    pub booking_service: BookingService,
    pub credit_service: CreditService,
    pub policy_service: PolicyService,
    pub reminder_service: ReminderService,
    pub slot_service: SlotService,
    pub template_service: TemplateService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let availability_repo = AvailabilityRepository::new(db_pool.clone());
        let slot_repo = SlotRepository::new(db_pool.clone());
        let reservation_repo = ReservationRepository::new(db_pool.clone());
        let credit_repo = CreditRepository::new(db_pool.clone());
        let policy_repo = PolicyRepository::new(db_pool.clone());
        let template_repo = TemplateRepository::new(db_pool.clone());
        let reminder_repo = ReminderRepository::new(db_pool.clone());

        // Colaboradores externos: e-mail e auditoria são canais laterais,
        // injetados por trait para o transporte real ficar fora daqui.
        let audit: Arc<dyn crate::services::audit::AuditSink> = Arc::new(TracingAuditSink);
        let mailer: Arc<dyn crate::services::mailer::Mailer> = Arc::new(LogMailer);

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone());
        let availability_service =
            AvailabilityService::new(availability_repo, reservation_repo.clone());
        let policy_service = PolicyService::new(
            policy_repo,
            reservation_repo.clone(),
            db_pool.clone(),
        );
        let booking_service = BookingService::new(
            reservation_repo.clone(),
            slot_repo.clone(),
            user_repo.clone(),
            credit_repo.clone(),
            policy_service.clone(),
            audit.clone(),
            db_pool.clone(),
        );
        let credit_service = CreditService::new(
            user_repo.clone(),
            credit_repo,
            audit,
            db_pool.clone(),
        );
        let reminder_service = ReminderService::new(
            reservation_repo,
            user_repo,
            reminder_repo,
            mailer,
            db_pool.clone(),
        );
        let slot_service = SlotService::new(slot_repo.clone(), db_pool.clone());
        let template_service = TemplateService::new(template_repo, slot_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            availability_service,
            booking_service,
            credit_service,
            policy_service,
            reminder_service,
            slot_service,
            template_service,
        })
    }
}
