use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Reusable dish definition in a chef's catalog.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: Uuid,
    pub chef_id: Uuid,
    pub nome_piatto: String,
    pub categoria: String,
    pub descrizione: Option<String>,
    pub food_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const DISH_COLUMNS: &str =
    "id, chef_id, nome_piatto, categoria, descrizione, food_type, created_at, updated_at";

impl Dish {
    /// Newest-first listing, optionally filtered by category.
    pub async fn list(
        db: &PgPool,
        chef_id: Uuid,
        categoria: Option<&str>,
        limit: i64,
    ) -> anyhow::Result<Vec<Dish>> {
        let rows = sqlx::query_as::<_, Dish>(&format!(
            r#"
            SELECT {DISH_COLUMNS}
            FROM dishes
            WHERE chef_id = $1 AND ($2::text IS NULL OR categoria = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#
        ))
        .bind(chef_id)
        .bind(categoria)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Ownership is enforced by the chef filter: another chef's dish looks
    /// exactly like a missing one.
    pub async fn find(db: &PgPool, chef_id: Uuid, dish_id: Uuid) -> anyhow::Result<Option<Dish>> {
        let dish = sqlx::query_as::<_, Dish>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes WHERE id = $1 AND chef_id = $2"
        ))
        .bind(dish_id)
        .bind(chef_id)
        .fetch_optional(db)
        .await?;
        Ok(dish)
    }

    pub async fn create(
        db: &PgPool,
        chef_id: Uuid,
        nome_piatto: &str,
        categoria: &str,
        descrizione: Option<&str>,
        food_type: &str,
    ) -> anyhow::Result<Dish> {
        let dish = sqlx::query_as::<_, Dish>(&format!(
            r#"
            INSERT INTO dishes (chef_id, nome_piatto, categoria, descrizione, food_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DISH_COLUMNS}
            "#
        ))
        .bind(chef_id)
        .bind(nome_piatto)
        .bind(categoria)
        .bind(descrizione)
        .bind(food_type)
        .fetch_one(db)
        .await?;
        Ok(dish)
    }

    /// Partial update; only supplied fields change. None when the dish does
    /// not belong to the chef.
    pub async fn update(
        db: &PgPool,
        chef_id: Uuid,
        dish_id: Uuid,
        nome_piatto: Option<&str>,
        categoria: Option<&str>,
        descrizione: Option<&str>,
        food_type: Option<&str>,
    ) -> anyhow::Result<Option<Dish>> {
        let dish = sqlx::query_as::<_, Dish>(&format!(
            r#"
            UPDATE dishes
            SET nome_piatto = COALESCE($3, nome_piatto),
                categoria = COALESCE($4, categoria),
                descrizione = COALESCE($5, descrizione),
                food_type = COALESCE($6, food_type),
                updated_at = now()
            WHERE id = $1 AND chef_id = $2
            RETURNING {DISH_COLUMNS}
            "#
        ))
        .bind(dish_id)
        .bind(chef_id)
        .bind(nome_piatto)
        .bind(categoria)
        .bind(descrizione)
        .bind(food_type)
        .fetch_optional(db)
        .await?;
        Ok(dish)
    }

    /// Hard delete. Menu snapshot rows are untouched by design.
    pub async fn delete(db: &PgPool, chef_id: Uuid, dish_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM dishes WHERE id = $1 AND chef_id = $2")
            .bind(dish_id)
            .bind(chef_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
