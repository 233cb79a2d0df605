use crate::error::{DatabaseError, Result};
use chrono::Utc;
use dam_models::{NewTeam, Team, TeamMember};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

#[derive(Clone)]
pub struct TeamRepository {
    pool: SqlitePool,
}

impl TeamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, conn: &mut SqliteConnection, new_team: &NewTeam) -> Result<Team> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (id, company_id, name, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_team.company_id)
        .bind(&new_team.name)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(team)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Team> {
        let team = sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Team", &id.to_string()))?;

        Ok(team)
    }

    pub async fn list(&self) -> Result<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>("SELECT * FROM teams ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(teams)
    }

    pub async fn add_member(
        &self,
        conn: &mut SqliteConnection,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<TeamMember> {
        let member = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO team_members (team_id, user_id, added_at)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(member)
    }

    pub async fn remove_member(
        &self,
        conn: &mut SqliteConnection,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<()> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = ? AND user_id = ?")
            .bind(team_id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Membership of user {} in team {}",
                user_id, team_id
            )));
        }
        Ok(())
    }

    /// Team ids the user belongs to, for the evaluator's TEAM rule.
    pub async fn team_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT team_id FROM team_members WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }
}
