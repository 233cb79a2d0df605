use std::collections::HashSet;

use crate::error::{DatabaseError, Result};
use async_trait::async_trait;
use chrono::Utc;
use dam_models::{AssetShare, AssetTeamShare};
use dam_visibility::{SharingCapability, SharingError};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Grant rows behind SELECTED_USERS and TEAM visibility. This repository is
/// the SQL-backed `SharingCapability` handed to the evaluator.
#[derive(Clone)]
pub struct ShareRepository {
    pool: SqlitePool,
}

impl ShareRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add_user_share(
        &self,
        conn: &mut SqliteConnection,
        asset_id: Uuid,
        user_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> Result<AssetShare> {
        let share = sqlx::query_as::<_, AssetShare>(
            r#"
            INSERT INTO asset_shares (asset_id, user_id, granted_by, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(asset_id)
        .bind(user_id)
        .bind(granted_by)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(share)
    }

    pub async fn remove_user_share(
        &self,
        conn: &mut SqliteConnection,
        asset_id: Uuid,
        user_id: Uuid,
    ) -> Result<()> {
        let result = sqlx::query("DELETE FROM asset_shares WHERE asset_id = ? AND user_id = ?")
            .bind(asset_id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Share of asset {} with user {}",
                asset_id, user_id
            )));
        }
        Ok(())
    }

    pub async fn add_team_share(
        &self,
        conn: &mut SqliteConnection,
        asset_id: Uuid,
        team_id: Uuid,
        granted_by: Option<Uuid>,
    ) -> Result<AssetTeamShare> {
        let share = sqlx::query_as::<_, AssetTeamShare>(
            r#"
            INSERT INTO asset_team_shares (asset_id, team_id, granted_by, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(asset_id)
        .bind(team_id)
        .bind(granted_by)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(share)
    }

    pub async fn remove_team_share(
        &self,
        conn: &mut SqliteConnection,
        asset_id: Uuid,
        team_id: Uuid,
    ) -> Result<()> {
        let result = sqlx::query("DELETE FROM asset_team_shares WHERE asset_id = ? AND team_id = ?")
            .bind(asset_id)
            .bind(team_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Share of asset {} with team {}",
                asset_id, team_id
            )));
        }
        Ok(())
    }

    pub async fn list_user_shares(&self, asset_id: Uuid) -> Result<Vec<AssetShare>> {
        let shares = sqlx::query_as::<_, AssetShare>(
            "SELECT * FROM asset_shares WHERE asset_id = ? ORDER BY created_at",
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shares)
    }

    pub async fn list_team_shares(&self, asset_id: Uuid) -> Result<Vec<AssetTeamShare>> {
        let shares = sqlx::query_as::<_, AssetTeamShare>(
            "SELECT * FROM asset_team_shares WHERE asset_id = ? ORDER BY created_at",
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shares)
    }

    /// Asset ids granted directly to the user. One of the two prefetch
    /// queries behind list filtering.
    pub async fn direct_grants_for_user(&self, user_id: Uuid) -> Result<HashSet<Uuid>> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT asset_id FROM asset_shares WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids.into_iter().collect())
    }

    /// (asset_id, team_id) pairs reachable through the user's teams.
    pub async fn team_grants_for_user(&self, user_id: Uuid) -> Result<HashSet<(Uuid, Uuid)>> {
        let pairs: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT ats.asset_id, ats.team_id
            FROM asset_team_shares ats
            JOIN team_members tm ON tm.team_id = ats.team_id
            WHERE tm.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pairs.into_iter().collect())
    }
}

#[async_trait]
impl SharingCapability for ShareRepository {
    async fn is_shared_with_user(
        &self,
        asset_id: Uuid,
        user_id: Uuid,
    ) -> std::result::Result<bool, SharingError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM asset_shares WHERE asset_id = ? AND user_id = ?")
                .bind(asset_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| SharingError::Unavailable(e.to_string()))?;

        Ok(count > 0)
    }

    async fn is_shared_with_team(
        &self,
        asset_id: Uuid,
        team_id: Uuid,
    ) -> std::result::Result<bool, SharingError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM asset_team_shares WHERE asset_id = ? AND team_id = ?",
        )
        .bind(asset_id)
        .bind(team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| SharingError::Unavailable(e.to_string()))?;

        Ok(count > 0)
    }
}
