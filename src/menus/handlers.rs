use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::dto::{CreateMenuRequest, UpdateMenuRequest, MAX_CUISINE_TYPES};
use super::repo::Menu;
use crate::auth::extractors::Principal;
use crate::dishes::dto::normalize_descrizione;
use crate::error::ApiError;
use crate::response::{created, ok, Envelope};
use crate::state::AppState;
use crate::uploads::is_allowed_image_url;

/// Ownership precondition shared with the menu-dish binding routes.
pub(crate) async fn assert_menu_owned(
    db: &PgPool,
    chef_id: Uuid,
    menu_id: Uuid,
) -> Result<Menu, ApiError> {
    Menu::find(db, chef_id, menu_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Menu non trovato".into()))
}

fn check_cuisine_count(count: usize) -> Result<(), ApiError> {
    if count > MAX_CUISINE_TYPES {
        return Err(ApiError::BadRequest(format!(
            "A menu can have at most {MAX_CUISINE_TYPES} cuisine types"
        )));
    }
    Ok(())
}

fn check_image_ref(value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(v) if !is_allowed_image_url(v) => Err(ApiError::BadRequest(
            "Image must be an http(s) URL or a /static path".into(),
        )),
        _ => Ok(()),
    }
}

fn normalize_image(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[instrument(skip(state))]
pub async fn list_menus(
    State(state): State<AppState>,
    principal: Principal,
    Path(chef_id): Path<Uuid>,
) -> Result<Json<Envelope<Vec<Menu>>>, ApiError> {
    principal.require_chef(chef_id)?;
    let menus = Menu::list(&state.db, chef_id).await?;
    Ok(ok(menus))
}

#[instrument(skip(state))]
pub async fn get_menu(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, menu_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Envelope<Menu>>, ApiError> {
    principal.require_chef(chef_id)?;
    let menu = assert_menu_owned(&state.db, chef_id, menu_id).await?;
    Ok(ok(menu))
}

#[instrument(skip(state, payload))]
pub async fn create_menu(
    State(state): State<AppState>,
    principal: Principal,
    Path(chef_id): Path<Uuid>,
    Json(payload): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<Envelope<Menu>>), ApiError> {
    principal.require_chef(chef_id)?;
    payload.validate()?;
    check_cuisine_count(payload.cuisine_types.len())?;

    let image_url = normalize_image(payload.image_url);
    let image_path = normalize_image(payload.image_path);
    check_image_ref(image_url.as_deref())?;
    check_image_ref(image_path.as_deref())?;

    let descrizione = normalize_descrizione(payload.descrizione);
    let cuisine_types: Vec<String> = payload
        .cuisine_types
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();

    let menu = Menu::create(
        &state.db,
        chef_id,
        payload.nome.trim(),
        descrizione.as_deref(),
        image_url.as_deref(),
        image_path.as_deref(),
        payload.balance.as_str(),
        &cuisine_types,
    )
    .await?;

    info!(chef_id = %chef_id, menu_id = %menu.id, "menu created");
    Ok(created(menu))
}

#[instrument(skip(state, payload))]
pub async fn update_menu(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, menu_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMenuRequest>,
) -> Result<Json<Envelope<Menu>>, ApiError> {
    principal.require_chef(chef_id)?;
    payload.validate()?;

    let current = assert_menu_owned(&state.db, chef_id, menu_id).await?;

    if let Some(types) = &payload.cuisine_types {
        check_cuisine_count(types.len())?;
    }

    // Absent keeps the stored value; explicit null clears it.
    let image_url = match payload.image_url {
        None => current.image_url,
        Some(value) => normalize_image(value),
    };
    let image_path = match payload.image_path {
        None => current.image_path,
        Some(value) => normalize_image(value),
    };
    check_image_ref(image_url.as_deref())?;
    check_image_ref(image_path.as_deref())?;

    let nome = match &payload.nome {
        Some(n) => n.trim().to_string(),
        None => current.nome,
    };
    let descrizione = match payload.descrizione {
        Some(d) => normalize_descrizione(Some(d)),
        None => current.descrizione,
    };
    let balance = payload
        .balance
        .map(|b| b.as_str().to_string())
        .unwrap_or(current.balance);
    let cuisine_types = match payload.cuisine_types {
        Some(types) => types.iter().map(|c| c.as_str().to_string()).collect(),
        None => current.cuisine_types,
    };

    let menu = Menu::update(
        &state.db,
        chef_id,
        menu_id,
        &nome,
        descrizione.as_deref(),
        image_url.as_deref(),
        image_path.as_deref(),
        &balance,
        &cuisine_types,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Menu non trovato".into()))?;

    info!(chef_id = %chef_id, menu_id = %menu_id, "menu updated");
    Ok(ok(menu))
}

#[instrument(skip(state))]
pub async fn delete_menu(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, menu_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    principal.require_chef(chef_id)?;
    assert_menu_owned(&state.db, chef_id, menu_id).await?;
    Menu::delete(&state.db, chef_id, menu_id).await?;
    info!(chef_id = %chef_id, menu_id = %menu_id, "menu deleted");
    Ok(ok(serde_json::json!({ "deleted": true })))
}
