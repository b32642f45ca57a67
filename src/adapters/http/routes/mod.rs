pub mod auth;
pub mod history;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(app_state))
        .nest("/history", history::router(app_state))
}
