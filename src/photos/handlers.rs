use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use super::dto::{CreateDishPhotoRequest, UpdateDishPhotoRequest};
use super::repo::ChefDishPhoto;
use crate::auth::extractors::Principal;
use crate::error::ApiError;
use crate::response::{created, ok, Envelope};
use crate::state::AppState;
use crate::uploads::{
    collect_upload, ext_for_mime, is_allowed_image_url, public_url, randomized_name,
};

/// Public gallery listing; no authentication.
#[instrument(skip(state))]
pub async fn list_photos(
    State(state): State<AppState>,
    Path(chef_id): Path<Uuid>,
) -> Result<Json<Envelope<Vec<ChefDishPhoto>>>, ApiError> {
    let photos = ChefDishPhoto::list_by_chef(&state.db, chef_id).await?;
    Ok(ok(photos))
}

#[instrument(skip(state, payload))]
pub async fn create_photo(
    State(state): State<AppState>,
    principal: Principal,
    Path(chef_id): Path<Uuid>,
    Json(payload): Json<CreateDishPhotoRequest>,
) -> Result<(StatusCode, Json<Envelope<ChefDishPhoto>>), ApiError> {
    principal.require_chef(chef_id)?;
    payload.validate()?;

    let image_url = payload.image_url.trim().to_string();
    if !is_allowed_image_url(&image_url) {
        return Err(ApiError::BadRequest(
            "Image must be an http(s) URL or a /static path".into(),
        ));
    }

    let photo = ChefDishPhoto::insert(
        &state.db,
        chef_id,
        &image_url,
        None,
        None,
        payload.description.as_deref(),
        payload.image_width,
        payload.image_height,
    )
    .await?;

    info!(chef_id = %chef_id, photo_id = %photo.id, "dish photo created");
    Ok(created(photo))
}

/// Multipart upload, field `file`, optional `description`. Files from every
/// chef share one directory, so names carry a random suffix.
#[instrument(skip(state, mp))]
pub async fn upload_photo(
    State(state): State<AppState>,
    principal: Principal,
    Path(chef_id): Path<Uuid>,
    mp: Multipart,
) -> Result<(StatusCode, Json<Envelope<ChefDishPhoto>>), ApiError> {
    principal.require_chef(chef_id)?;
    let upload = collect_upload(mp, "file").await?;
    let file = upload.file;

    if let Some(description) = &upload.description {
        if description.chars().count() > 240 {
            return Err(ApiError::Validation("Invalid value for: description".into()));
        }
    }

    let ext = ext_for_mime(&file.content_type)
        .ok_or_else(|| ApiError::BadRequest("Unsupported image type".into()))?;
    let rel_path = format!("dishes/{}", randomized_name("dish", ext));
    let url = public_url(&state.config.uploads.public_base, &rel_path);

    state
        .storage
        .save(&rel_path, file.bytes)
        .await
        .map_err(ApiError::Internal)?;

    let photo = match ChefDishPhoto::insert(
        &state.db,
        chef_id,
        &url,
        Some(&rel_path),
        Some(&file.content_type),
        upload.description.as_deref(),
        None,
        None,
    )
    .await
    {
        Ok(photo) => photo,
        Err(e) => {
            // The upload is not visible until the row exists; remove the file.
            if let Err(cleanup) = state.storage.delete(&rel_path).await {
                warn!(error = %cleanup, path = %rel_path, "orphaned upload cleanup failed");
            }
            return Err(ApiError::Internal(e));
        }
    };

    info!(chef_id = %chef_id, photo_id = %photo.id, path = %rel_path, "dish photo uploaded");
    Ok(created(photo))
}

#[instrument(skip(state, payload))]
pub async fn update_photo(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, photo_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateDishPhotoRequest>,
) -> Result<Json<Envelope<ChefDishPhoto>>, ApiError> {
    principal.require_chef(chef_id)?;
    payload.validate()?;

    let photo = match payload.description.as_deref() {
        Some(description) => {
            ChefDishPhoto::update_description(&state.db, chef_id, photo_id, description).await?
        }
        None => ChefDishPhoto::find(&state.db, chef_id, photo_id).await?,
    }
    .ok_or_else(|| ApiError::NotFound("Foto non trovata".into()))?;

    Ok(ok(photo))
}

/// Best-effort file removal, then the row. The row is the source of truth;
/// an orphaned file never fails the request.
#[instrument(skip(state))]
pub async fn delete_photo(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, photo_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    principal.require_chef(chef_id)?;

    let photo = ChefDishPhoto::find(&state.db, chef_id, photo_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Foto non trovata".into()))?;

    let rel_path = photo
        .image_path
        .clone()
        .or_else(|| disk_path_from_url(&photo.image_url));
    if let Some(rel_path) = rel_path {
        if let Err(e) = state.storage.delete(&rel_path).await {
            warn!(error = %e, path = %rel_path, "photo file cleanup failed");
        }
    }

    ChefDishPhoto::delete(&state.db, chef_id, photo_id).await?;
    info!(chef_id = %chef_id, photo_id = %photo_id, "dish photo deleted");
    Ok(ok(serde_json::json!({ "deleted": true })))
}

/// Older rows carry only a `/static/...` URL; recover the relative path from it.
fn disk_path_from_url(image_url: &str) -> Option<String> {
    image_url
        .strip_prefix("/static/")
        .filter(|rest| !rest.is_empty())
        .map(|rest| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_path_parses_only_static_urls() {
        assert_eq!(
            disk_path_from_url("/static/dishes/dish-1.jpg"),
            Some("dishes/dish-1.jpg".to_string())
        );
        assert_eq!(disk_path_from_url("https://cdn.example.com/a.jpg"), None);
        assert_eq!(disk_path_from_url("/static/"), None);
    }
}
