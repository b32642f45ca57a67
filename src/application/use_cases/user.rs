use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        password::{hash_password, verify_password},
        validators::{normalize_email, normalize_name, validate_password},
    },
    domain::entities::{role::Role, user::User},
};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;
    async fn record_login(&self, user_id: Uuid, at: NaiveDateTime) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
}

impl AuthUseCases {
    pub fn new(repo: Arc<dyn UserRepo>) -> Self {
        Self { repo }
    }

    /// New accounts always get `Role::User`.
    #[instrument(skip(self, password))]
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        let name = normalize_name(name)?;
        let email = normalize_email(email)?;
        validate_password(password)?;

        if self.repo.get_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let password_hash = hash_off_thread(password.to_owned()).await?;
        let user = self
            .repo
            .create(NewUser {
                name,
                email,
                password_hash,
                role: Role::User,
            })
            .await?;

        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email).map_err(|_| AppError::InvalidCredentials)?;
        let Some(mut user) = self.repo.get_by_email(&email).await? else {
            return Err(AppError::InvalidCredentials);
        };

        let stored = user.password_hash.clone();
        let candidate = password.to_owned();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("password check panicked: {e}")))?;
        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        let now = Utc::now().naive_utc();
        self.repo.record_login(user.id, now).await?;
        user.last_login_at = Some(now);
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        self.repo.get_by_id(user_id).await?.ok_or(AppError::NotFound)
    }
}

async fn hash_off_thread(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("password hashing panicked: {e}")))?
}
