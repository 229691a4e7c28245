use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:chef_id/profile",
            get(handlers::get_profile)
                .patch(handlers::update_profile)
                .put(handlers::update_profile),
        )
        .route(
            "/:chef_id/profile/photo",
            post(handlers::upload_photo).layer(DefaultBodyLimit::max(6 * 1024 * 1024)),
        )
}
