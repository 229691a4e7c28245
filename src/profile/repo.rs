use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::UpdateProfileRequest;

/// Chef profile record, one-to-one with a chef. Created lazily on the first
/// profile write or photo upload.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChefProfile {
    pub id: Uuid,
    pub chef_id: Uuid,
    pub profile_image_url: Option<String>,
    pub profile_image_path: Option<String>,
    pub profile_image_mime: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub languages: Vec<String>,
    pub skills: Vec<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub service_radius_km: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const PROFILE_COLUMNS: &str = r#"id, chef_id, profile_image_url, profile_image_path,
       profile_image_mime, bio, website, languages, skills, address, region, country,
       service_radius_km, created_at, updated_at"#;

impl ChefProfile {
    pub async fn find_by_chef(db: &PgPool, chef_id: Uuid) -> anyhow::Result<Option<ChefProfile>> {
        let profile = sqlx::query_as::<_, ChefProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM chef_profiles WHERE chef_id = $1"
        ))
        .bind(chef_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Partial upsert: unsupplied fields keep their current value, a missing
    /// row is created with defaults.
    pub async fn upsert(
        db: &PgPool,
        chef_id: Uuid,
        update: &UpdateProfileRequest,
    ) -> anyhow::Result<ChefProfile> {
        let profile = sqlx::query_as::<_, ChefProfile>(&format!(
            r#"
            INSERT INTO chef_profiles (chef_id, bio, website, languages, skills,
                                       address, region, country, service_radius_km)
            VALUES ($1, $2, $3, COALESCE($4, ARRAY[]::text[]), COALESCE($5, ARRAY[]::text[]),
                    $6, $7, $8, $9)
            ON CONFLICT (chef_id) DO UPDATE SET
                bio = COALESCE(EXCLUDED.bio, chef_profiles.bio),
                website = COALESCE(EXCLUDED.website, chef_profiles.website),
                languages = COALESCE($4, chef_profiles.languages),
                skills = COALESCE($5, chef_profiles.skills),
                address = COALESCE(EXCLUDED.address, chef_profiles.address),
                region = COALESCE(EXCLUDED.region, chef_profiles.region),
                country = COALESCE(EXCLUDED.country, chef_profiles.country),
                service_radius_km = COALESCE(EXCLUDED.service_radius_km, chef_profiles.service_radius_km),
                updated_at = now()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(chef_id)
        .bind(update.bio.as_deref())
        .bind(update.website.as_deref())
        .bind(update.languages.as_deref())
        .bind(update.skills.as_deref())
        .bind(update.address.as_deref())
        .bind(update.region.as_deref())
        .bind(update.country.as_deref())
        .bind(update.service_radius_km)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    pub async fn update_photo(
        db: &PgPool,
        chef_id: Uuid,
        image_url: &str,
        image_path: &str,
        image_mime: &str,
    ) -> anyhow::Result<ChefProfile> {
        let profile = sqlx::query_as::<_, ChefProfile>(&format!(
            r#"
            INSERT INTO chef_profiles (chef_id, profile_image_url, profile_image_path, profile_image_mime)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (chef_id) DO UPDATE SET
                profile_image_url = EXCLUDED.profile_image_url,
                profile_image_path = EXCLUDED.profile_image_path,
                profile_image_mime = EXCLUDED.profile_image_mime,
                updated_at = now()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(chef_id)
        .bind(image_url)
        .bind(image_path)
        .bind(image_mime)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }
}
