use crate::error::Result;
use chrono::Utc;
use dam_models::asset::NewAssetVersion;
use dam_models::AssetVersion;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Versions are immutable snapshots: insert and read only. Rows disappear
/// solely through the parent asset's cascade.
#[derive(Clone)]
pub struct VersionRepository {
    pool: SqlitePool,
}

impl VersionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Next version number is computed inside the caller's transaction;
    /// the (asset_id, version_number) unique index backstops it.
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        asset_id: Uuid,
        uploaded_by: Uuid,
        new_version: &NewAssetVersion,
    ) -> Result<AssetVersion> {
        let next_number: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(version_number), 0) + 1 FROM asset_versions WHERE asset_id = ?",
        )
        .bind(asset_id)
        .fetch_one(&mut *conn)
        .await?;

        let version = sqlx::query_as::<_, AssetVersion>(
            r#"
            INSERT INTO asset_versions (id, asset_id, version_number, file_key, file_name,
                                        content_type, size_bytes, uploaded_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(asset_id)
        .bind(next_number)
        .bind(&new_version.file_key)
        .bind(&new_version.file_name)
        .bind(&new_version.content_type)
        .bind(new_version.size_bytes)
        .bind(uploaded_by)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(version)
    }

    pub async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<AssetVersion>> {
        let versions = sqlx::query_as::<_, AssetVersion>(
            r#"
            SELECT * FROM asset_versions
            WHERE asset_id = ?
            ORDER BY version_number ASC
            "#,
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(versions)
    }

    pub async fn count_for_asset(&self, asset_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM asset_versions WHERE asset_id = ?")
                .bind(asset_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
