// src/services/audit.rs

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

// Evento estruturado consumido pelo canal lateral de auditoria.
// Quem consome decide o destino; o núcleo só publica e segue em frente.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    // Quem fez (None = ação do sistema, ex.: webhook de pagamento)
    pub actor: Option<Uuid>,
    pub action: &'static str,
    pub target: Uuid,
    pub before: Value,
    pub after: Value,
}

// A auditoria é consumidora de efeitos, nunca dependência de sucesso:
// nenhum caminho de negócio falha porque o sink falhou.
pub trait AuditSink: Send + Sync {
    fn publish(&self, event: AuditEvent);
}

// Implementação padrão: registros estruturados no tracing, separados
// pelo target "audit" para o coletor filtrar.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn publish(&self, event: AuditEvent) {
        tracing::info!(
            target: "audit",
            actor = ?event.actor,
            action = %event.action,
            entity = %event.target,
            before = %event.before,
            after = %event.after,
            "evento de auditoria"
        );
    }
}
