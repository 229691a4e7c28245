use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:chef_id/menus",
            get(handlers::list_menus).post(handlers::create_menu),
        )
        .route(
            "/:chef_id/menus/:menu_id",
            get(handlers::get_menu)
                .patch(handlers::update_menu)
                .delete(handlers::delete_menu),
        )
}
