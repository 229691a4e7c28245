use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Gallery photo owned by a chef. `image_path` is the on-disk relative path
/// used for deletion; pre-hosted photos have none.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChefDishPhoto {
    pub id: Uuid,
    pub chef_id: Uuid,
    pub image_url: String,
    pub image_path: Option<String>,
    pub image_mime: Option<String>,
    pub description: Option<String>,
    pub image_width: Option<i32>,
    pub image_height: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const PHOTO_COLUMNS: &str = "id, chef_id, image_url, image_path, image_mime, description, image_width, image_height, created_at, updated_at";

impl ChefDishPhoto {
    pub async fn list_by_chef(db: &PgPool, chef_id: Uuid) -> anyhow::Result<Vec<ChefDishPhoto>> {
        let rows = sqlx::query_as::<_, ChefDishPhoto>(&format!(
            r#"
            SELECT {PHOTO_COLUMNS}
            FROM chef_dish_photos
            WHERE chef_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(chef_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(
        db: &PgPool,
        chef_id: Uuid,
        photo_id: Uuid,
    ) -> anyhow::Result<Option<ChefDishPhoto>> {
        let row = sqlx::query_as::<_, ChefDishPhoto>(&format!(
            "SELECT {PHOTO_COLUMNS} FROM chef_dish_photos WHERE id = $1 AND chef_id = $2"
        ))
        .bind(photo_id)
        .bind(chef_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        db: &PgPool,
        chef_id: Uuid,
        image_url: &str,
        image_path: Option<&str>,
        image_mime: Option<&str>,
        description: Option<&str>,
        image_width: Option<i32>,
        image_height: Option<i32>,
    ) -> anyhow::Result<ChefDishPhoto> {
        let row = sqlx::query_as::<_, ChefDishPhoto>(&format!(
            r#"
            INSERT INTO chef_dish_photos (chef_id, image_url, image_path, image_mime,
                                          description, image_width, image_height)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PHOTO_COLUMNS}
            "#
        ))
        .bind(chef_id)
        .bind(image_url)
        .bind(image_path)
        .bind(image_mime)
        .bind(description)
        .bind(image_width)
        .bind(image_height)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update_description(
        db: &PgPool,
        chef_id: Uuid,
        photo_id: Uuid,
        description: &str,
    ) -> anyhow::Result<Option<ChefDishPhoto>> {
        let row = sqlx::query_as::<_, ChefDishPhoto>(&format!(
            r#"
            UPDATE chef_dish_photos
            SET description = $3, updated_at = now()
            WHERE id = $1 AND chef_id = $2
            RETURNING {PHOTO_COLUMNS}
            "#
        ))
        .bind(photo_id)
        .bind(chef_id)
        .bind(description)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, chef_id: Uuid, photo_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM chef_dish_photos WHERE id = $1 AND chef_id = $2")
            .bind(photo_id)
            .bind(chef_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
