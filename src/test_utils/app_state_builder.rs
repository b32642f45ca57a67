use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        jwt::TokenCodec,
        use_cases::{
            history::{HistoryUseCases, PredictionRepo},
            user::{AuthUseCases, UserRepo},
        },
    },
    domain::entities::{prediction::Prediction, user::User},
    infra::config::AppConfig,
};

use super::{
    FailingPredictionRepo, FailingUserRepo, InMemoryPredictionRepo, InMemoryUserRepo,
};

pub const TEST_JWT_SECRET: &str = "test_jwt_secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new(TEST_JWT_SECRET.into()),
        access_token_ttl: Duration::hours(24),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        cookie_secure: false,
        database_url: String::new(),
        db_max_connections: 5,
    }
}

/// Issues a valid session token for `user` with its stored role.
pub fn token_for(app_state: &AppState, user: &User) -> String {
    let codec = &app_state.token_codec;
    codec
        .issue(&codec.claim_for(user.id, user.role))
        .expect("test token should encode")
}

/// Builds an `AppState` backed by in-memory repositories.
#[derive(Default)]
pub struct TestAppStateBuilder {
    users: Vec<User>,
    predictions: Vec<Prediction>,
    failing_history: bool,
    failing_accounts: bool,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Records are stored oldest first; add them in creation order.
    pub fn with_prediction(mut self, prediction: Prediction) -> Self {
        self.predictions.push(prediction);
        self
    }

    pub fn with_predictions(mut self, predictions: Vec<Prediction>) -> Self {
        self.predictions.extend(predictions);
        self
    }

    /// Every history call fails with a database error.
    pub fn with_failing_history(mut self) -> Self {
        self.failing_history = true;
        self
    }

    /// Every account call fails with a database error.
    pub fn with_failing_accounts(mut self) -> Self {
        self.failing_accounts = true;
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_repos().0
    }

    /// Also hands back the repositories so tests can inspect stored state.
    pub fn build_with_repos(self) -> (AppState, Arc<InMemoryUserRepo>, Arc<InMemoryPredictionRepo>) {
        let config = test_config();
        let token_codec = Arc::new(TokenCodec::new(
            &config.jwt_secret,
            config.access_token_ttl,
        ));

        let user_repo = Arc::new(InMemoryUserRepo::with_users(self.users));
        let prediction_repo = Arc::new(InMemoryPredictionRepo::with_predictions(
            user_repo.clone(),
            self.predictions,
        ));
        let history_repo: Arc<dyn PredictionRepo> = if self.failing_history {
            Arc::new(FailingPredictionRepo)
        } else {
            prediction_repo.clone()
        };

        let account_repo: Arc<dyn UserRepo> = if self.failing_accounts {
            Arc::new(FailingUserRepo)
        } else {
            user_repo.clone()
        };

        let app_state = AppState {
            config: Arc::new(config),
            token_codec,
            auth_use_cases: Arc::new(AuthUseCases::new(account_repo)),
            history_use_cases: Arc::new(HistoryUseCases::new(history_repo)),
        };
        (app_state, user_repo, prediction_repo)
    }
}
