use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use super::dto::UpdateProfileRequest;
use super::repo::ChefProfile;
use crate::auth::extractors::Principal;
use crate::error::ApiError;
use crate::response::{created, ok, Envelope};
use crate::state::AppState;
use crate::uploads::{collect_upload, ext_for_mime, public_url, timestamped_name};

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    principal: Principal,
    Path(chef_id): Path<Uuid>,
) -> Result<Json<Envelope<ChefProfile>>, ApiError> {
    principal.require_chef(chef_id)?;
    let profile = ChefProfile::find_by_chef(&state.db, chef_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;
    Ok(ok(profile))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    principal: Principal,
    Path(chef_id): Path<Uuid>,
    Json(mut payload): Json<UpdateProfileRequest>,
) -> Result<Json<Envelope<ChefProfile>>, ApiError> {
    principal.require_chef(chef_id)?;
    payload.validate()?;
    payload.normalize();

    if let Some(website) = &payload.website {
        if !(website.starts_with("http://") || website.starts_with("https://")) {
            return Err(ApiError::BadRequest(
                "Website must be an http(s) URL".into(),
            ));
        }
    }

    let profile = ChefProfile::upsert(&state.db, chef_id, &payload).await?;
    info!(chef_id = %chef_id, "profile updated");
    Ok(ok(profile))
}

/// Multipart upload, field `photo`. The previous file is removed from disk
/// only after the row points at the new one.
#[instrument(skip(state, mp))]
pub async fn upload_photo(
    State(state): State<AppState>,
    principal: Principal,
    Path(chef_id): Path<Uuid>,
    mp: Multipart,
) -> Result<(StatusCode, Json<Envelope<ChefProfile>>), ApiError> {
    principal.require_chef(chef_id)?;
    let upload = collect_upload(mp, "photo").await?;
    let file = upload.file;

    let ext = ext_for_mime(&file.content_type)
        .ok_or_else(|| ApiError::BadRequest("Unsupported image type".into()))?;
    let rel_path = format!("profiles/{}/{}", chef_id, timestamped_name("profile", ext));
    let url = public_url(&state.config.uploads.public_base, &rel_path);

    state
        .storage
        .save(&rel_path, file.bytes)
        .await
        .map_err(ApiError::Internal)?;

    let previous = ChefProfile::find_by_chef(&state.db, chef_id)
        .await?
        .and_then(|p| p.profile_image_path);

    let profile =
        match ChefProfile::update_photo(&state.db, chef_id, &url, &rel_path, &file.content_type)
            .await
        {
            Ok(profile) => profile,
            Err(e) => {
                // The row is the source of truth; drop the freshly written file.
                if let Err(cleanup) = state.storage.delete(&rel_path).await {
                    warn!(error = %cleanup, path = %rel_path, "orphaned upload cleanup failed");
                }
                return Err(ApiError::Internal(e));
            }
        };

    if let Some(old_path) = previous {
        if old_path != rel_path {
            if let Err(e) = state.storage.delete(&old_path).await {
                warn!(error = %e, path = %old_path, "old profile photo cleanup failed");
            }
        }
    }

    info!(chef_id = %chef_id, path = %rel_path, "profile photo uploaded");
    Ok(created(profile))
}
