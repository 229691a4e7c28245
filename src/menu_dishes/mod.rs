use axum::routing::{get, patch};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:chef_id/menus/:menu_id/dishes",
            get(handlers::list_menu_dishes).post(handlers::add_dish),
        )
        .route(
            "/:chef_id/menus/:menu_id/dishes/reorder",
            patch(handlers::reorder),
        )
        .route(
            "/:chef_id/menus/:menu_id/dishes/:menu_dish_id",
            patch(handlers::update_menu_dish).delete(handlers::remove_menu_dish),
        )
}
