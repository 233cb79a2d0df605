use crate::error::{DatabaseError, Result};
use chrono::Utc;
use dam_models::{Company, NewCompany};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

#[derive(Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        new_company: &NewCompany,
    ) -> Result<Company> {
        let now = Utc::now();
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_company.name)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(company)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Company", &id.to_string()))?;

        Ok(company)
    }

    pub async fn list(&self) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(companies)
    }

    pub async fn delete(&self, conn: &mut SqliteConnection, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Company", &id.to_string()));
        }
        Ok(())
    }
}
