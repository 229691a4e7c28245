use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::dto::{normalize_descrizione, CreateDishRequest, ListDishesQuery, UpdateDishRequest};
use super::repo::Dish;
use crate::auth::extractors::Principal;
use crate::error::ApiError;
use crate::response::{created, ok, Envelope};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list_dishes(
    State(state): State<AppState>,
    principal: Principal,
    Path(chef_id): Path<Uuid>,
    Query(query): Query<ListDishesQuery>,
) -> Result<Json<Envelope<Vec<Dish>>>, ApiError> {
    principal.require_chef(chef_id)?;
    let dishes = Dish::list(
        &state.db,
        chef_id,
        query.categoria.map(|c| c.as_str()),
        query.effective_limit(),
    )
    .await?;
    Ok(ok(dishes))
}

#[instrument(skip(state))]
pub async fn get_dish(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, dish_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Envelope<Dish>>, ApiError> {
    principal.require_chef(chef_id)?;
    let dish = Dish::find(&state.db, chef_id, dish_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Piatto non trovato".into()))?;
    Ok(ok(dish))
}

#[instrument(skip(state, payload))]
pub async fn create_dish(
    State(state): State<AppState>,
    principal: Principal,
    Path(chef_id): Path<Uuid>,
    Json(payload): Json<CreateDishRequest>,
) -> Result<(StatusCode, Json<Envelope<Dish>>), ApiError> {
    principal.require_chef(chef_id)?;
    payload.validate()?;

    let descrizione = normalize_descrizione(payload.descrizione);
    let dish = Dish::create(
        &state.db,
        chef_id,
        payload.nome_piatto.trim(),
        payload.categoria.as_str(),
        descrizione.as_deref(),
        payload.food_type.as_str(),
    )
    .await?;

    info!(chef_id = %chef_id, dish_id = %dish.id, "dish created");
    Ok(created(dish))
}

#[instrument(skip(state, payload))]
pub async fn update_dish(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, dish_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateDishRequest>,
) -> Result<Json<Envelope<Dish>>, ApiError> {
    principal.require_chef(chef_id)?;
    payload.validate()?;

    let nome = payload.nome_piatto.as_deref().map(str::trim);
    let descrizione = normalize_descrizione(payload.descrizione);
    let dish = Dish::update(
        &state.db,
        chef_id,
        dish_id,
        nome,
        payload.categoria.map(|c| c.as_str()),
        descrizione.as_deref(),
        payload.food_type.map(|f| f.as_str()),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Piatto non trovato".into()))?;

    info!(chef_id = %chef_id, dish_id = %dish_id, "dish updated");
    Ok(ok(dish))
}

#[instrument(skip(state))]
pub async fn delete_dish(
    State(state): State<AppState>,
    principal: Principal,
    Path((chef_id, dish_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    principal.require_chef(chef_id)?;
    let deleted = Dish::delete(&state.db, chef_id, dish_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Piatto non trovato".into()));
    }
    info!(chef_id = %chef_id, dish_id = %dish_id, "dish deleted");
    Ok(ok(serde_json::json!({ "deleted": true })))
}
