use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::ReorderItem;
use crate::dishes::repo::Dish;

/// Join row binding a dish into a menu, with a denormalized snapshot of the
/// dish's display fields taken at insertion time. The snapshot is never
/// synced with later edits to the source dish.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuDish {
    pub id: Uuid,
    pub chef_id: Uuid,
    pub menu_id: Uuid,
    pub dish_id: Uuid,
    pub categoria: String,
    pub nome_piatto: String,
    pub descrizione: Option<String>,
    pub ordine: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const MENU_DISH_COLUMNS: &str = "id, chef_id, menu_id, dish_id, categoria, nome_piatto, descrizione, ordine, created_at, updated_at";

impl MenuDish {
    /// Insert with the snapshot copied from the live dish. A missing `ordine`
    /// defaults to the menu's current maximum plus one, computed inside the
    /// insert statement.
    pub async fn insert(
        db: &PgPool,
        chef_id: Uuid,
        menu_id: Uuid,
        dish: &Dish,
        ordine: Option<i32>,
    ) -> Result<MenuDish, sqlx::Error> {
        sqlx::query_as::<_, MenuDish>(&format!(
            r#"
            INSERT INTO menu_dishes (chef_id, menu_id, dish_id, categoria, nome_piatto, descrizione, ordine)
            VALUES ($1, $2, $3, $4, $5, $6,
                    COALESCE($7, (SELECT COALESCE(MAX(ordine), 0) + 1
                                    FROM menu_dishes WHERE menu_id = $2)))
            RETURNING {MENU_DISH_COLUMNS}
            "#
        ))
        .bind(chef_id)
        .bind(menu_id)
        .bind(dish.id)
        .bind(&dish.categoria)
        .bind(&dish.nome_piatto)
        .bind(dish.descrizione.as_deref())
        .bind(ordine)
        .fetch_one(db)
        .await
    }

    /// Ties in `ordine` fall back to insertion order for a stable listing.
    pub async fn list_by_menu(
        db: &PgPool,
        chef_id: Uuid,
        menu_id: Uuid,
    ) -> anyhow::Result<Vec<MenuDish>> {
        let rows = sqlx::query_as::<_, MenuDish>(&format!(
            r#"
            SELECT {MENU_DISH_COLUMNS}
            FROM menu_dishes
            WHERE menu_id = $1 AND chef_id = $2
            ORDER BY ordine ASC, created_at ASC
            "#
        ))
        .bind(menu_id)
        .bind(chef_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(
        db: &PgPool,
        chef_id: Uuid,
        menu_id: Uuid,
        menu_dish_id: Uuid,
    ) -> anyhow::Result<Option<MenuDish>> {
        let row = sqlx::query_as::<_, MenuDish>(&format!(
            "SELECT {MENU_DISH_COLUMNS} FROM menu_dishes WHERE id = $1 AND menu_id = $2 AND chef_id = $3"
        ))
        .bind(menu_dish_id)
        .bind(menu_id)
        .bind(chef_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn update_ordine(
        db: &PgPool,
        chef_id: Uuid,
        menu_id: Uuid,
        menu_dish_id: Uuid,
        ordine: i32,
    ) -> anyhow::Result<Option<MenuDish>> {
        let row = sqlx::query_as::<_, MenuDish>(&format!(
            r#"
            UPDATE menu_dishes
            SET ordine = $4, updated_at = now()
            WHERE id = $1 AND menu_id = $2 AND chef_id = $3
            RETURNING {MENU_DISH_COLUMNS}
            "#
        ))
        .bind(menu_dish_id)
        .bind(menu_id)
        .bind(chef_id)
        .bind(ordine)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// How many of the given row ids belong to this chef+menu. The bulk
    /// reorder compares this against the input set before touching anything.
    pub async fn count_owned(
        db: &PgPool,
        chef_id: Uuid,
        menu_id: Uuid,
        ids: &[Uuid],
    ) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM menu_dishes
            WHERE menu_id = $1 AND chef_id = $2 AND id = ANY($3)
            "#,
        )
        .bind(menu_id)
        .bind(chef_id)
        .bind(ids)
        .fetch_one(db)
        .await?;
        Ok(count)
    }

    /// Apply every ordinal update in one transaction: a partial reorder can
    /// never be observed.
    pub async fn reorder(
        db: &PgPool,
        chef_id: Uuid,
        menu_id: Uuid,
        items: &[ReorderItem],
    ) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        for item in items {
            sqlx::query(
                r#"
                UPDATE menu_dishes
                SET ordine = $4, updated_at = now()
                WHERE id = $1 AND menu_id = $2 AND chef_id = $3
                "#,
            )
            .bind(item.id)
            .bind(menu_id)
            .bind(chef_id)
            .bind(item.ordine)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete(
        db: &PgPool,
        chef_id: Uuid,
        menu_id: Uuid,
        menu_dish_id: Uuid,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "DELETE FROM menu_dishes WHERE id = $1 AND menu_id = $2 AND chef_id = $3",
        )
        .bind(menu_dish_id)
        .bind(menu_id)
        .bind(chef_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
