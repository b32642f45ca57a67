use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    application::jwt::TokenCodec,
    infra::config::AppConfig,
    use_cases::{history::HistoryUseCases, user::AuthUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_codec: Arc<TokenCodec>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub history_use_cases: Arc<HistoryUseCases>,
}

impl FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.token_codec.clone()
    }
}
