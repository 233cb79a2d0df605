use crate::error::{DatabaseError, Result};
use chrono::Utc;
use dam_models::asset::NewCarouselItem;
use dam_models::CarouselItem;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

#[derive(Clone)]
pub struct CarouselRepository {
    pool: SqlitePool,
}

impl CarouselRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        asset_id: Uuid,
        new_item: &NewCarouselItem,
        position: i64,
    ) -> Result<CarouselItem> {
        let item = sqlx::query_as::<_, CarouselItem>(
            r#"
            INSERT INTO carousel_items (id, asset_id, position, file_key, caption, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(asset_id)
        .bind(position)
        .bind(&new_item.file_key)
        .bind(&new_item.caption)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;

        Ok(item)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CarouselItem>> {
        let item = sqlx::query_as::<_, CarouselItem>("SELECT * FROM carousel_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    pub async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<CarouselItem>> {
        let items = sqlx::query_as::<_, CarouselItem>(
            r#"
            SELECT * FROM carousel_items
            WHERE asset_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Position after the current tail, inside the caller's transaction.
    pub async fn next_position(&self, conn: &mut SqliteConnection, asset_id: Uuid) -> Result<i64> {
        let next: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM carousel_items WHERE asset_id = ?",
        )
        .bind(asset_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(next)
    }

    pub async fn set_position(
        &self,
        conn: &mut SqliteConnection,
        id: Uuid,
        position: i64,
    ) -> Result<()> {
        sqlx::query("UPDATE carousel_items SET position = ? WHERE id = ?")
            .bind(position)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, conn: &mut SqliteConnection, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM carousel_items WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Carousel item", &id.to_string()));
        }
        Ok(())
    }
}
