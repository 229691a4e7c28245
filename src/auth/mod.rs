use axum::routing::{get, post, put};
use axum::{middleware, Router};

use crate::rate_limit::password_change_limit;
use crate::state::AppState;

pub mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub fn router(state: AppState) -> Router<AppState> {
    let rate_limited = Router::new()
        .route("/change-password", put(handlers::change_password))
        .route_layer(middleware::from_fn_with_state(state, password_change_limit));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/refresh", post(handlers::refresh))
        .route("/me", get(handlers::me))
        .merge(rate_limited)
}
