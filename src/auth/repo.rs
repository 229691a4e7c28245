use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::claims::Role;

/// Chef record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Chef {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone_prefix: String,
    pub phone_number: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Chef {
    pub fn role(&self) -> Role {
        match self.role.as_str() {
            "admin" => Role::Admin,
            _ => Role::Chef,
        }
    }

    /// Find a chef by (lowercased) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Chef>> {
        let chef = sqlx::query_as::<_, Chef>(
            r#"
            SELECT id, first_name, last_name, country_code, phone_prefix, phone_number,
                   email, password_hash, role, created_at, updated_at
            FROM chefs
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(chef)
    }

    /// The (prefix, number) pair is unique across chefs.
    pub async fn find_by_phone(
        db: &PgPool,
        phone_prefix: &str,
        phone_number: &str,
    ) -> anyhow::Result<Option<Chef>> {
        let chef = sqlx::query_as::<_, Chef>(
            r#"
            SELECT id, first_name, last_name, country_code, phone_prefix, phone_number,
                   email, password_hash, role, created_at, updated_at
            FROM chefs
            WHERE phone_prefix = $1 AND phone_number = $2
            "#,
        )
        .bind(phone_prefix)
        .bind(phone_number)
        .fetch_optional(db)
        .await?;
        Ok(chef)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Chef>> {
        let chef = sqlx::query_as::<_, Chef>(
            r#"
            SELECT id, first_name, last_name, country_code, phone_prefix, phone_number,
                   email, password_hash, role, created_at, updated_at
            FROM chefs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(chef)
    }

    /// Create a new chef with hashed password.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        first_name: &str,
        last_name: &str,
        country_code: &str,
        phone_prefix: &str,
        phone_number: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Chef, sqlx::Error> {
        sqlx::query_as::<_, Chef>(
            r#"
            INSERT INTO chefs (first_name, last_name, country_code, phone_prefix,
                               phone_number, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, first_name, last_name, country_code, phone_prefix, phone_number,
                      email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(country_code)
        .bind(phone_prefix)
        .bind(phone_number)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn update_password(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE chefs
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chef_with_role(role: &str) -> Chef {
        Chef {
            id: Uuid::new_v4(),
            first_name: "Anna".into(),
            last_name: "Bianchi".into(),
            country_code: "IT".into(),
            phone_prefix: "+39".into(),
            phone_number: "3331234567".into(),
            email: "a@b.com".into(),
            password_hash: "hash".into(),
            role: role.into(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn role_parsing_defaults_to_chef() {
        assert_eq!(chef_with_role("admin").role(), Role::Admin);
        assert_eq!(chef_with_role("chef").role(), Role::Chef);
        assert_eq!(chef_with_role("whatever").role(), Role::Chef);
    }

    #[test]
    fn password_hash_never_serializes() {
        let json = serde_json::to_string(&chef_with_role("chef")).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("hash"));
    }
}
