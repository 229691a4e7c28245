use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:chef_id/dishes",
            get(handlers::list_dishes).post(handlers::create_dish),
        )
        .route(
            "/:chef_id/dishes/:dish_id",
            get(handlers::get_dish)
                .patch(handlers::update_dish)
                .delete(handlers::delete_dish),
        )
}
