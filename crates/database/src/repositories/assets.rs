use crate::error::{DatabaseError, Result};
use chrono::Utc;
use dam_models::asset::{AssetFilter, AssetUpdate, NewAsset};
use dam_models::{Asset, AssetStatus, UserRole, Visibility};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

#[derive(Clone)]
pub struct AssetRepository {
    pool: SqlitePool,
}

impl AssetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert in DRAFT with version counter 1; the first version row is the
    /// caller's job, in the same transaction.
    pub async fn insert(&self, conn: &mut SqliteConnection, new_asset: &NewAsset) -> Result<Asset> {
        let now = Utc::now();
        let asset = sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets (id, title, description, kind, upload_type, status,
                                visibility, allowed_role, company_id, uploader_id,
                                file_key, file_name, content_type, size_bytes,
                                current_version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 'DRAFT', ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_asset.title)
        .bind(&new_asset.description)
        .bind(new_asset.kind)
        .bind(new_asset.upload_type)
        .bind(new_asset.visibility)
        .bind(new_asset.allowed_role)
        .bind(new_asset.company_id)
        .bind(new_asset.uploader_id)
        .bind(&new_asset.file_key)
        .bind(&new_asset.file_name)
        .bind(&new_asset.content_type)
        .bind(new_asset.size_bytes)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(asset)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Asset>> {
        let asset = sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(asset)
    }

    /// Attribute filter only. Visibility filtering belongs to the evaluator;
    /// no permission logic lives in SQL.
    pub async fn list(&self, filter: &AssetFilter) -> Result<Vec<Asset>> {
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM assets WHERE 1=1");

        if let Some(status) = filter.status {
            query_builder.push(" AND status = ");
            query_builder.push_bind(status);
        }
        if let Some(kind) = filter.kind {
            query_builder.push(" AND kind = ");
            query_builder.push_bind(kind);
        }
        if let Some(upload_type) = filter.upload_type {
            query_builder.push(" AND upload_type = ");
            query_builder.push_bind(upload_type);
        }
        if let Some(uploader_id) = filter.uploader_id {
            query_builder.push(" AND uploader_id = ");
            query_builder.push_bind(uploader_id);
        }
        if let Some(company_id) = filter.company_id {
            query_builder.push(" AND company_id = ");
            query_builder.push_bind(company_id);
        }
        if let Some(ref search) = filter.search {
            query_builder.push(" AND title LIKE ");
            query_builder.push_bind(format!("%{}%", search));
        }

        query_builder.push(" ORDER BY created_at DESC");

        let assets = query_builder
            .build_query_as::<Asset>()
            .fetch_all(&self.pool)
            .await?;

        Ok(assets)
    }

    /// Review queue: oldest submissions first.
    pub async fn list_pending(&self, limit: i64, offset: i64) -> Result<Vec<Asset>> {
        let assets = sqlx::query_as::<_, Asset>(
            r#"
            SELECT * FROM assets
            WHERE status = 'PENDING_REVIEW'
            ORDER BY updated_at ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }

    pub async fn count_pending(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE status = 'PENDING_REVIEW'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    pub async fn update_details(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        update: &AssetUpdate,
    ) -> Result<Asset> {
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("UPDATE assets SET updated_at = ");
        query_builder.push_bind(Utc::now());

        if let Some(ref title) = update.title {
            query_builder.push(", title = ");
            query_builder.push_bind(title);
        }
        if let Some(ref description) = update.description {
            query_builder.push(", description = ");
            query_builder.push_bind(description);
        }

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);
        query_builder.push(" RETURNING *");

        let asset = query_builder
            .build_query_as::<Asset>()
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Asset", &id.to_string()))?;

        Ok(asset)
    }

    /// Conditional transition: the update applies only when the row still
    /// holds `expected`, so a concurrent reviewer surfaces as None instead
    /// of a silent lost update. Visibility may change atomically with the
    /// approval transition.
    pub async fn transition_status(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        expected: AssetStatus,
        next: AssetStatus,
        visibility_change: Option<(Visibility, Option<UserRole>)>,
    ) -> Result<Option<Asset>> {
        let now = Utc::now();
        let asset = match visibility_change {
            Some((visibility, allowed_role)) => {
                sqlx::query_as::<_, Asset>(
                    r#"
                    UPDATE assets
                    SET status = ?, visibility = ?, allowed_role = ?, updated_at = ?
                    WHERE id = ? AND status = ?
                    RETURNING *
                    "#,
                )
                .bind(next)
                .bind(visibility)
                .bind(allowed_role)
                .bind(now)
                .bind(id)
                .bind(expected)
                .fetch_optional(&mut *conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, Asset>(
                    r#"
                    UPDATE assets
                    SET status = ?, updated_at = ?
                    WHERE id = ? AND status = ?
                    RETURNING *
                    "#,
                )
                .bind(next)
                .bind(now)
                .bind(id)
                .bind(expected)
                .fetch_optional(&mut *conn)
                .await?
            }
        };

        Ok(asset)
    }

    pub async fn set_visibility(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        visibility: Visibility,
        allowed_role: Option<UserRole>,
    ) -> Result<Asset> {
        let asset = sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET visibility = ?, allowed_role = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(visibility)
        .bind(allowed_role)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Asset", &id.to_string()))?;

        Ok(asset)
    }

    /// Mirror the latest version's file onto the asset row.
    pub async fn set_current_file(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        file_key: &str,
        file_name: &str,
        content_type: Option<&str>,
        size_bytes: Option<i64>,
        version_number: i64,
    ) -> Result<Asset> {
        let asset = sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET file_key = ?, file_name = ?, content_type = ?, size_bytes = ?,
                current_version = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(file_key)
        .bind(file_name)
        .bind(content_type)
        .bind(size_bytes)
        .bind(version_number)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Asset", &id.to_string()))?;

        Ok(asset)
    }

    pub async fn delete(&self, conn: &mut SqliteConnection, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM assets WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Asset", &id.to_string()));
        }
        Ok(())
    }
}
