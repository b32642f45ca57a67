//! In-memory mock implementations of the repository traits.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        history::PredictionRepo,
        user::{NewUser, UserRepo},
    },
    domain::entities::{
        prediction::{NewPrediction, OwnerSummary, Prediction, PredictionWithOwner},
        user::User,
    },
};

// ============================================================================
// InMemoryUserRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let map: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Mutex::new(map),
        }
    }

    pub fn remove(&self, user_id: Uuid) {
        self.users.lock().unwrap().remove(&user_id);
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        let now = Utc::now().naive_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            last_login_at: None,
            total_predictions: 0,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn record_login(&self, user_id: Uuid, at: NaiveDateTime) -> AppResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&user_id) {
            user.last_login_at = Some(at);
            user.updated_at = at;
        }
        Ok(())
    }
}

// ============================================================================
// InMemoryPredictionRepo
// ============================================================================

/// Keeps records in insertion order; listing walks it backwards.
pub struct InMemoryPredictionRepo {
    pub predictions: Mutex<Vec<Prediction>>,
    users: Arc<InMemoryUserRepo>,
}

impl InMemoryPredictionRepo {
    pub fn new(users: Arc<InMemoryUserRepo>) -> Self {
        Self {
            predictions: Mutex::new(vec![]),
            users,
        }
    }

    pub fn with_predictions(users: Arc<InMemoryUserRepo>, predictions: Vec<Prediction>) -> Self {
        Self {
            predictions: Mutex::new(predictions),
            users,
        }
    }
}

#[async_trait]
impl PredictionRepo for InMemoryPredictionRepo {
    async fn insert(&self, owner_id: Uuid, new: &NewPrediction) -> AppResult<Prediction> {
        let mut users = self.users.users.lock().unwrap();
        let owner = users.get_mut(&owner_id).ok_or(AppError::NotFound)?;
        owner.total_predictions += 1;

        let now = Utc::now().naive_utc();
        let prediction = Prediction {
            id: Uuid::new_v4(),
            user_id: owner_id,
            text: new.text.clone(),
            model_used: new.model_used,
            final_label: new.final_label,
            final_confidence: new.final_confidence,
            sub_model_outputs: new.sub_model_outputs.clone(),
            external_prediction_id: new.external_prediction_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.predictions.lock().unwrap().push(prediction.clone());
        Ok(prediction)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Prediction>> {
        Ok(self
            .predictions
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|p| p.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_for_owner(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Prediction>> {
        Ok(self
            .predictions
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && p.user_id == owner_id)
            .cloned())
    }

    async fn delete_for_owner(&self, owner_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut predictions = self.predictions.lock().unwrap();
        let before = predictions.len();
        predictions.retain(|p| !(p.id == id && p.user_id == owner_id));
        Ok(predictions.len() < before)
    }

    async fn list_all_with_owner(&self) -> AppResult<Vec<PredictionWithOwner>> {
        let predictions = self.predictions.lock().unwrap().clone();
        let users = self.users.users.lock().unwrap();
        Ok(predictions
            .into_iter()
            .rev()
            .map(|prediction| {
                let owner = users.get(&prediction.user_id).map(|u| OwnerSummary {
                    name: u.name.clone(),
                    email: u.email.clone(),
                    role: u.role,
                });
                PredictionWithOwner { prediction, owner }
            })
            .collect())
    }
}

// ============================================================================
// Failing repos
// ============================================================================

/// The error a dropped database connection would surface.
fn connection_failure() -> AppError {
    AppError::Database("connection refused (os error 111) at 10.0.0.5:5432".into())
}

/// Every call fails the way a dropped database connection would.
#[derive(Default)]
pub struct FailingUserRepo;

#[async_trait]
impl UserRepo for FailingUserRepo {
    async fn create(&self, _new_user: NewUser) -> AppResult<User> {
        Err(connection_failure())
    }

    async fn get_by_email(&self, _email: &str) -> AppResult<Option<User>> {
        Err(connection_failure())
    }

    async fn get_by_id(&self, _user_id: Uuid) -> AppResult<Option<User>> {
        Err(connection_failure())
    }

    async fn record_login(&self, _user_id: Uuid, _at: NaiveDateTime) -> AppResult<()> {
        Err(connection_failure())
    }
}

/// Every call fails the way a dropped database connection would.
#[derive(Default)]
pub struct FailingPredictionRepo;

#[async_trait]
impl PredictionRepo for FailingPredictionRepo {
    async fn insert(&self, _owner_id: Uuid, _new: &NewPrediction) -> AppResult<Prediction> {
        Err(connection_failure())
    }

    async fn list_for_owner(&self, _owner_id: Uuid) -> AppResult<Vec<Prediction>> {
        Err(connection_failure())
    }

    async fn get_for_owner(&self, _owner_id: Uuid, _id: Uuid) -> AppResult<Option<Prediction>> {
        Err(connection_failure())
    }

    async fn delete_for_owner(&self, _owner_id: Uuid, _id: Uuid) -> AppResult<bool> {
        Err(connection_failure())
    }

    async fn list_all_with_owner(&self) -> AppResult<Vec<PredictionWithOwner>> {
        Err(connection_failure())
    }
}
