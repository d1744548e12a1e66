use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{chat, health, mmi};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .merge(mmi::router())
        .merge(chat::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
