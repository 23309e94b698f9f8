//! Audit log repository — append-only.

use skyferry_common::models::audit::AuditLog;
use sqlx::PgPool;
use uuid::Uuid;

/// One audit entry to append.
pub struct AuditEntry<'a> {
    pub organization_id: Uuid,
    pub ferry_flight_id: Option<Uuid>,
    pub actor_id: Uuid,
    pub action: &'a str,
    pub entity_type: &'a str,
    pub entity_id: Uuid,
    pub details: serde_json::Value,
}

pub async fn record(pool: &PgPool, id: Uuid, entry: AuditEntry<'_>) -> Result<AuditLog, sqlx::Error> {
    sqlx::query_as::<_, AuditLog>(
        r#"
        INSERT INTO audit_logs (
            id, organization_id, ferry_flight_id, actor_id,
            action, entity_type, entity_id, details, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(entry.organization_id)
    .bind(entry.ferry_flight_id)
    .bind(entry.actor_id)
    .bind(entry.action)
    .bind(entry.entity_type)
    .bind(entry.entity_id)
    .bind(entry.details)
    .fetch_one(pool)
    .await
}

/// A flight's audit trail, newest first.
pub async fn list_for_flight(
    pool: &PgPool,
    ferry_flight_id: Uuid,
    limit: i64,
) -> Result<Vec<AuditLog>, sqlx::Error> {
    sqlx::query_as::<_, AuditLog>(
        r#"
        SELECT * FROM audit_logs
        WHERE ferry_flight_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(ferry_flight_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
