use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Named menu composed from dish snapshots.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: Uuid,
    pub chef_id: Uuid,
    pub nome: String,
    pub descrizione: Option<String>,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub balance: String,
    pub cuisine_types: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const MENU_COLUMNS: &str = "id, chef_id, nome, descrizione, image_url, image_path, balance, cuisine_types, created_at, updated_at";

impl Menu {
    pub async fn list(db: &PgPool, chef_id: Uuid) -> anyhow::Result<Vec<Menu>> {
        let rows = sqlx::query_as::<_, Menu>(&format!(
            r#"
            SELECT {MENU_COLUMNS}
            FROM menus
            WHERE chef_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(chef_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// The reusable ownership precondition: filtered by both id and chef.
    pub async fn find(db: &PgPool, chef_id: Uuid, menu_id: Uuid) -> anyhow::Result<Option<Menu>> {
        let menu = sqlx::query_as::<_, Menu>(&format!(
            "SELECT {MENU_COLUMNS} FROM menus WHERE id = $1 AND chef_id = $2"
        ))
        .bind(menu_id)
        .bind(chef_id)
        .fetch_optional(db)
        .await?;
        Ok(menu)
    }

    pub async fn create(
        db: &PgPool,
        chef_id: Uuid,
        nome: &str,
        descrizione: Option<&str>,
        image_url: Option<&str>,
        image_path: Option<&str>,
        balance: &str,
        cuisine_types: &[String],
    ) -> anyhow::Result<Menu> {
        let menu = sqlx::query_as::<_, Menu>(&format!(
            r#"
            INSERT INTO menus (chef_id, nome, descrizione, image_url, image_path, balance, cuisine_types)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MENU_COLUMNS}
            "#
        ))
        .bind(chef_id)
        .bind(nome)
        .bind(descrizione)
        .bind(image_url)
        .bind(image_path)
        .bind(balance)
        .bind(cuisine_types)
        .fetch_one(db)
        .await?;
        Ok(menu)
    }

    /// Full-row write; the handler resolves partial fields against the
    /// ownership-asserted current row first.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        chef_id: Uuid,
        menu_id: Uuid,
        nome: &str,
        descrizione: Option<&str>,
        image_url: Option<&str>,
        image_path: Option<&str>,
        balance: &str,
        cuisine_types: &[String],
    ) -> anyhow::Result<Option<Menu>> {
        let menu = sqlx::query_as::<_, Menu>(&format!(
            r#"
            UPDATE menus
            SET nome = $3, descrizione = $4, image_url = $5, image_path = $6,
                balance = $7, cuisine_types = $8, updated_at = now()
            WHERE id = $1 AND chef_id = $2
            RETURNING {MENU_COLUMNS}
            "#
        ))
        .bind(menu_id)
        .bind(chef_id)
        .bind(nome)
        .bind(descrizione)
        .bind(image_url)
        .bind(image_path)
        .bind(balance)
        .bind(cuisine_types)
        .fetch_optional(db)
        .await?;
        Ok(menu)
    }

    pub async fn delete(db: &PgPool, chef_id: Uuid, menu_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1 AND chef_id = $2")
            .bind(menu_id)
            .bind(chef_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
