//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use chrono::Local;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // O agendador de lembretes: um ticker de 15 minutos chamando uma
    // função sem estado. Toda a deduplicação vive no banco, então duas
    // instâncias (ou uma passada atrasada sobrepondo a próxima) não
    // duplicam envio.
    let reminder_service = app_state.reminder_service.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(15 * 60));
        loop {
            interval.tick().await;
            let now = Local::now().naive_local();
            match reminder_service.run_once(now).await {
                Ok(0) => {}
                Ok(sent) => tracing::info!("⏰ {} lembretes disparados", sent),
                Err(e) => tracing::error!("Falha na passada de lembretes: {}", e),
            }
        }
    });

    // Rotas públicas
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas do cliente autenticado
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let availability_routes = Router::new()
        .route("/", get(handlers::availability::get_available_slots))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let reservation_routes = Router::new()
        .route("/"
               ,post(handlers::reservations::create_reservation)
               .get(handlers::reservations::list_my_reservations)
        )
        .route("/{id}/cancel", post(handlers::reservations::cancel_my_reservation))
        .route("/{id}/refund-preview", get(handlers::reservations::refund_preview))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let credit_routes = Router::new()
        .route("/balance", get(handlers::credits::get_balance))
        .route("/transactions", get(handlers::credits::list_transactions))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas administrativas: auth_guard por fora, admin_guard por dentro
    let admin_routes = Router::new()
        .route("/slots"
               ,post(handlers::slots::create_slot)
               .get(handlers::slots::list_slots)
        )
        .route("/slots/{id}/status", patch(handlers::slots::change_slot_status))
        .route("/slots/{id}", axum::routing::delete(handlers::slots::delete_slot))
        .route("/weeks/unlock", post(handlers::slots::unlock_week))

        .route("/templates"
               ,post(handlers::templates::create_template)
               .get(handlers::templates::list_templates)
        )
        .route("/templates/{id}/slots", post(handlers::templates::add_template_slot))
        .route("/templates/{id}/apply", post(handlers::templates::apply_template))

        .route("/availability-rules"
               ,post(handlers::rules::create_rule)
               .get(handlers::rules::list_rules)
        )
        .route("/availability-rules/{id}", axum::routing::delete(handlers::rules::delete_rule))

        .route("/reservations"
               ,post(handlers::reservations::admin_create_reservation)
               .get(handlers::reservations::admin_list_reservations)
        )
        .route("/reservations/{id}/cancel", post(handlers::reservations::admin_cancel_reservation))
        .route("/reservations/{id}/note", patch(handlers::reservations::admin_update_note))
        .route("/reservations/{id}/remind", post(handlers::reservations::admin_send_reminder))

        .route("/credits/adjust", post(handlers::credits::admin_adjust_credits))

        .route("/policy"
               ,get(handlers::policy::get_policy)
               .put(handlers::policy::update_policy)
        )

        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O gateway de pagamento só sabe fazer POST: rota pública própria.
    let webhook_routes = Router::new()
        .route("/payment", post(handlers::credits::payment_webhook));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/availability", availability_routes)
        .nest("/api/reservations", reservation_routes)
        .nest("/api/credits", credit_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/webhooks", webhook_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
