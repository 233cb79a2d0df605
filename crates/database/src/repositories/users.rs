use crate::error::{DatabaseError, Result};
use chrono::Utc;
use dam_models::user::NewUser;
use dam_models::{User, UserRole};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Reads run on the pool; writes take a connection so services can compose
/// them with the audit append in one transaction.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        new_user: &NewUser,
        is_activated: bool,
    ) -> Result<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, display_name, role, company_id,
                               is_activated, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.display_name)
        .bind(new_user.role)
        .bind(new_user.company_id)
        .bind(is_activated)
        .bind(true)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("User", &id.to_string()))?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("User", email))?;

        Ok(user)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn admin_exists(&self) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'ADMIN'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn set_role(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        role: UserRole,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET role = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(role)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("User", &id.to_string()))?;

        Ok(user)
    }

    pub async fn set_activated(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        is_activated: bool,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_activated = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(is_activated)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("User", &id.to_string()))?;

        Ok(user)
    }

    pub async fn set_active(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        is_active: bool,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("User", &id.to_string()))?;

        Ok(user)
    }
}
