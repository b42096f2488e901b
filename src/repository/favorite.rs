use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use super::FavoriteStore;
use crate::models::{ContentRef, CreateOutcome, Favorite, FavoriteQuery, PageWindow};

const FAVORITE_COLUMNS: &str = "id, user_id, content_type, object_id, created_at";

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<Option<Favorite>, sqlx::Error> {
        sqlx::query_as::<_, Favorite>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites \
             WHERE user_id = $1 AND content_type = $2 AND object_id = $3"
        ))
        .bind(user_id)
        .bind(content.content_type.as_str())
        .bind(content.object_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl FavoriteStore for FavoriteRepository {
    #[instrument(name = "db.favorite.insert_if_absent", skip(self))]
    async fn insert_if_absent(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<CreateOutcome, sqlx::Error> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO favorites (user_id, content_type, object_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, content_type, object_id) DO NOTHING
                RETURNING id, user_id, content_type, object_id, created_at
            )
            SELECT id, user_id, content_type, object_id, created_at, TRUE AS created
            FROM inserted
            UNION ALL
            SELECT id, user_id, content_type, object_id, created_at, FALSE AS created
            FROM favorites
            WHERE user_id = $1 AND content_type = $2 AND object_id = $3
              AND NOT EXISTS (SELECT 1 FROM inserted)
            "#,
        )
        .bind(user_id)
        .bind(content.content_type.as_str())
        .bind(content.object_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let favorite = Favorite::from_row(&row)?;
            return Ok(if row.get::<bool, _>("created") {
                CreateOutcome::Created(favorite)
            } else {
                CreateOutcome::Existing(favorite)
            });
        }

        // The conflicting row was committed after this statement's snapshot.
        self.find_one(user_id, content)
            .await?
            .map(CreateOutcome::Existing)
            .ok_or(sqlx::Error::RowNotFound)
    }

    #[instrument(name = "db.favorite.find_for_object", skip(self))]
    async fn find_for_object(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<Vec<Favorite>, sqlx::Error> {
        Ok(self.find_one(user_id, content).await?.into_iter().collect())
    }

    #[instrument(name = "db.favorite.find_owned", skip(self))]
    async fn find_owned(&self, id: i64, user_id: i32) -> Result<Option<Favorite>, sqlx::Error> {
        sqlx::query_as::<_, Favorite>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    #[instrument(name = "db.favorite.count", skip(self))]
    async fn count(&self, user_id: i32, query: &FavoriteQuery) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM favorites
            WHERE user_id = $1
              AND (cardinality($2::text[]) = 0 OR content_type = ANY($2))
            "#,
        )
        .bind(user_id)
        .bind(query.content_type_names())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("count"))
    }

    #[instrument(name = "db.favorite.list", skip(self))]
    async fn list(
        &self,
        user_id: i32,
        query: &FavoriteQuery,
        window: PageWindow,
    ) -> Result<Vec<Favorite>, sqlx::Error> {
        sqlx::query_as::<_, Favorite>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites \
             WHERE user_id = $1 AND (cardinality($2::text[]) = 0 OR content_type = ANY($2)) \
             ORDER BY {} \
             LIMIT $3 OFFSET $4",
            query.order.as_sql()
        ))
        .bind(user_id)
        .bind(query.content_type_names())
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(name = "db.favorite.delete", skip(self))]
    async fn delete(&self, id: i64, user_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(name = "db.favorite.delete_for_object", skip(self))]
    async fn delete_for_object(
        &self,
        user_id: i32,
        content: &ContentRef,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM favorites WHERE user_id = $1 AND content_type = $2 AND object_id = $3",
        )
        .bind(user_id)
        .bind(content.content_type.as_str())
        .bind(content.object_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1 as one").fetch_one(&self.pool).await?;
        Ok(())
    }
}
