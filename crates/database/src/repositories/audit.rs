use crate::error::Result;
use chrono::Utc;
use dam_models::audit::{AuditLogFilter, NewAuditLogEntry};
use dam_models::AuditLogEntry;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Insert and read only. Update and delete are deliberately absent from
/// this interface; the storage triggers reject them for anything that
/// bypasses it.
#[derive(Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

async fn insert_entry<'e, E>(executor: E, entry: &NewAuditLogEntry) -> Result<AuditLogEntry>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let log = sqlx::query_as::<_, AuditLogEntry>(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource_type, resource_id,
                                metadata, ip_address, user_agent, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(entry.user_id)
    .bind(entry.action)
    .bind(entry.resource_type)
    .bind(entry.resource_id)
    .bind(&entry.metadata)
    .bind(&entry.ip_address)
    .bind(&entry.user_agent)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(log)
}

fn push_filters(query_builder: &mut QueryBuilder<Sqlite>, filter: &AuditLogFilter) {
    if let Some(user_id) = filter.user_id {
        query_builder.push(" AND user_id = ");
        query_builder.push_bind(user_id);
    }
    if let Some(action) = filter.action {
        query_builder.push(" AND action = ");
        query_builder.push_bind(action);
    }
    if let Some(resource_type) = filter.resource_type {
        query_builder.push(" AND resource_type = ");
        query_builder.push_bind(resource_type);
    }
    if let Some(resource_id) = filter.resource_id {
        query_builder.push(" AND resource_id = ");
        query_builder.push_bind(resource_id);
    }
    if let Some(from_date) = filter.from_date {
        query_builder.push(" AND created_at >= ");
        query_builder.push_bind(from_date);
    }
    if let Some(to_date) = filter.to_date {
        query_builder.push(" AND created_at <= ");
        query_builder.push_bind(to_date);
    }
}

impl AuditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Standalone append (no accompanying mutation).
    pub async fn create(&self, entry: &NewAuditLogEntry) -> Result<AuditLogEntry> {
        insert_entry(&self.pool, entry).await
    }

    /// Append inside the caller's transaction, so the entry commits or
    /// rolls back together with the mutation it records.
    pub async fn create_with(
        &self,
        conn: &mut SqliteConnection,
        entry: &NewAuditLogEntry,
    ) -> Result<AuditLogEntry> {
        insert_entry(&mut *conn, entry).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditLogEntry>> {
        let entry = sqlx::query_as::<_, AuditLogEntry>("SELECT * FROM audit_logs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entry)
    }

    pub async fn list(
        &self,
        filter: &AuditLogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLogEntry>> {
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM audit_logs WHERE 1=1");
        push_filters(&mut query_builder, filter);

        query_builder.push(" ORDER BY created_at DESC LIMIT ");
        query_builder.push_bind(limit);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset);

        let entries = query_builder
            .build_query_as::<AuditLogEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    pub async fn count(&self, filter: &AuditLogFilter) -> Result<i64> {
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM audit_logs WHERE 1=1");
        push_filters(&mut query_builder, filter);

        let count: i64 = query_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
