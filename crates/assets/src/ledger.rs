use dam_database::AuditRepository;
use dam_models::audit::{AuditLogEntry, AuditLogFilter, NewAuditLogEntry};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::Result;

/// Append-and-read facade over the audit store. There is deliberately no
/// update or delete surface; the schema rejects both.
#[derive(Clone)]
pub struct AuditLedger {
    repository: AuditRepository,
}

impl AuditLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: AuditRepository::new(pool),
        }
    }

    /// Append a standalone entry outside any transaction.
    pub async fn append(&self, entry: &NewAuditLogEntry) -> Result<AuditLogEntry> {
        Ok(self.repository.create(entry).await?)
    }

    /// Append on an open connection so the entry commits or rolls back
    /// together with the mutation it records.
    pub async fn append_with(
        &self,
        conn: &mut SqliteConnection,
        entry: &NewAuditLogEntry,
    ) -> Result<AuditLogEntry> {
        Ok(self.repository.create_with(conn, entry).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditLogEntry>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Page through matching entries, newest first. Returns the page and
    /// the total match count.
    pub async fn list(
        &self,
        filter: &AuditLogFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<AuditLogEntry>, i64)> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let entries = self.repository.list(filter, limit, offset).await?;
        let total = self.repository.count(filter).await?;

        Ok((entries, total))
    }
}
