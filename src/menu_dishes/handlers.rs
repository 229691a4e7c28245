use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{AddDishRequest, ReorderRequest, UpdateMenuDishRequest};
use super::repo::MenuDish;
use crate::auth::extractors::Principal;
use crate::dishes::repo::Dish;
use crate::error::{conflict_on_unique, ApiError};
use crate::menus::handlers::assert_menu_owned;
use crate::response::{created, ok, Envelope};
use crate::state::AppState;

#[instrument(skip(state, payload))]
pub async fn add_dish(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, menu_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AddDishRequest>,
) -> Result<(StatusCode, Json<Envelope<MenuDish>>), ApiError> {
    principal.require_chef(chef_id)?;
    assert_menu_owned(&state.db, chef_id, menu_id).await?;

    let dish = Dish::find(&state.db, chef_id, payload.dish_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Piatto non trovato".into()))?;

    let row = MenuDish::insert(&state.db, chef_id, menu_id, &dish, payload.ordine)
        .await
        .map_err(|e| conflict_on_unique(e, "Piatto già presente nel menu"))?;

    info!(chef_id = %chef_id, menu_id = %menu_id, dish_id = %dish.id, "dish added to menu");
    Ok(created(row))
}

#[instrument(skip(state))]
pub async fn list_menu_dishes(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, menu_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Envelope<Vec<MenuDish>>>, ApiError> {
    principal.require_chef(chef_id)?;
    assert_menu_owned(&state.db, chef_id, menu_id).await?;
    let rows = MenuDish::list_by_menu(&state.db, chef_id, menu_id).await?;
    Ok(ok(rows))
}

#[instrument(skip(state, payload))]
pub async fn update_menu_dish(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, menu_id, menu_dish_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(payload): Json<UpdateMenuDishRequest>,
) -> Result<Json<Envelope<MenuDish>>, ApiError> {
    principal.require_chef(chef_id)?;
    assert_menu_owned(&state.db, chef_id, menu_id).await?;

    let row = match payload.ordine {
        Some(ordine) => MenuDish::update_ordine(&state.db, chef_id, menu_id, menu_dish_id, ordine)
            .await?,
        // nothing to change; still assert the row exists
        None => MenuDish::find(&state.db, chef_id, menu_id, menu_dish_id).await?,
    }
    .ok_or_else(|| ApiError::NotFound("Piatto non trovato nel menu".into()))?;

    info!(chef_id = %chef_id, menu_id = %menu_id, menu_dish_id = %menu_dish_id, "menu dish updated");
    Ok(ok(row))
}

/// All-or-nothing bulk reorder: every referenced row must belong to this
/// chef+menu or no ordinal changes at all.
#[instrument(skip(state, payload))]
pub async fn reorder(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, menu_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<Envelope<Vec<MenuDish>>>, ApiError> {
    principal.require_chef(chef_id)?;
    assert_menu_owned(&state.db, chef_id, menu_id).await?;

    let ids = payload.distinct_ids().ok_or_else(|| {
        ApiError::BadRequest("items must be non-empty with unique ids".into())
    })?;

    let owned = MenuDish::count_owned(&state.db, chef_id, menu_id, &ids).await?;
    if owned != ids.len() as i64 {
        return Err(ApiError::NotFound("Piatto non trovato nel menu".into()));
    }

    MenuDish::reorder(&state.db, chef_id, menu_id, &payload.items).await?;

    let rows = MenuDish::list_by_menu(&state.db, chef_id, menu_id).await?;
    info!(chef_id = %chef_id, menu_id = %menu_id, count = payload.items.len(), "menu reordered");
    Ok(ok(rows))
}

#[instrument(skip(state))]
pub async fn remove_menu_dish(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, menu_id, menu_dish_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    principal.require_chef(chef_id)?;
    assert_menu_owned(&state.db, chef_id, menu_id).await?;

    let deleted = MenuDish::delete(&state.db, chef_id, menu_id, menu_dish_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Piatto non trovato nel menu".into()));
    }
    info!(chef_id = %chef_id, menu_id = %menu_id, menu_dish_id = %menu_dish_id, "menu dish removed");
    Ok(ok(serde_json::json!({ "deleted": true })))
}
