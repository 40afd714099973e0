// src/services/mailer.rs

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

// Capacidade externa de envio de e-mail. O transporte real (SMTP,
// provedor SaaS, fila) vive fora deste repositório; aqui só a interface
// fire-and-forget que o agendador de lembretes consome.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_reminder_email(
        &self,
        to: &str,
        first_name: Option<&str>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> anyhow::Result<()>;
}

// Implementação de desenvolvimento: loga o disparo em vez de enviar.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_reminder_email(
        &self,
        to: &str,
        first_name: Option<&str>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> anyhow::Result<()> {
        tracing::info!(
            "📧 Lembrete para {} ({}): sessão em {} das {} às {}",
            to,
            first_name.unwrap_or("-"),
            date,
            start_time,
            end_time
        );
        Ok(())
    }
}
