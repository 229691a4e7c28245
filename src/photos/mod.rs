use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:chef_id/dish-photos",
            get(handlers::list_photos).post(handlers::create_photo),
        )
        .route(
            "/:chef_id/dish-photos/upload",
            post(handlers::upload_photo).layer(DefaultBodyLimit::max(6 * 1024 * 1024)),
        )
        .route(
            "/:chef_id/dish-photos/:photo_id",
            patch(handlers::update_photo).delete(handlers::delete_photo),
        )
}
