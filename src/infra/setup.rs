use crate::{
    adapters::http::app_state::AppState,
    application::jwt::TokenCodec,
    infra::{config::AppConfig, postgres_persistence},
    use_cases::{
        history::{HistoryUseCases, PredictionRepo},
        user::{AuthUseCases, UserRepo},
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc =
        Arc::new(postgres_persistence(&config.database_url, config.db_max_connections).await?);

    let token_codec = TokenCodec::new(&config.jwt_secret, config.access_token_ttl);

    let auth_use_cases = AuthUseCases::new(postgres_arc.clone() as Arc<dyn UserRepo>);
    let history_use_cases = HistoryUseCases::new(postgres_arc as Arc<dyn PredictionRepo>);

    Ok(AppState {
        config: Arc::new(config),
        token_codec: Arc::new(token_codec),
        auth_use_cases: Arc::new(auth_use_cases),
        history_use_cases: Arc::new(history_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "newscheck=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs); skipped when app.log cannot be created.
    let json_layer = match File::create("app.log") {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .with_writer(Arc::new(file))
                .with_current_span(true)
                .with_span_list(true),
        ),
        Err(err) => {
            eprintln!("app.log unavailable, logging to console only: {err}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
