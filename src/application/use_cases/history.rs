use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::is_valid_confidence,
    domain::entities::prediction::{NewPrediction, Prediction, PredictionWithOwner},
};

/// Every owner-scoped method matches on record id AND owner id together.
#[async_trait]
pub trait PredictionRepo: Send + Sync {
    /// Stores the record and bumps the owner's `total_predictions` atomically.
    /// Fails with `NotFound` when the owner account no longer exists.
    async fn insert(&self, owner_id: Uuid, new: &NewPrediction) -> AppResult<Prediction>;
    /// Newest first.
    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Prediction>>;
    async fn get_for_owner(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Prediction>>;
    /// Returns whether a row was removed.
    async fn delete_for_owner(&self, owner_id: Uuid, id: Uuid) -> AppResult<bool>;
    /// Every record regardless of owner, newest first.
    async fn list_all_with_owner(&self) -> AppResult<Vec<PredictionWithOwner>>;
}

#[derive(Clone)]
pub struct HistoryUseCases {
    repo: Arc<dyn PredictionRepo>,
}

impl HistoryUseCases {
    pub fn new(repo: Arc<dyn PredictionRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, new), fields(text_len = new.text.len()))]
    pub async fn record(&self, owner_id: Uuid, mut new: NewPrediction) -> AppResult<Prediction> {
        new.text = new.text.trim().to_string();
        if new.text.is_empty() {
            return Err(AppError::InvalidInput("Text must not be empty".into()));
        }
        let all_confidences_valid = std::iter::once(new.final_confidence)
            .chain(new.sub_model_outputs.scores())
            .all(is_valid_confidence);
        if !all_confidences_valid {
            return Err(AppError::InvalidInput(
                "Confidence must be between 0 and 1".into(),
            ));
        }

        let prediction = self.repo.insert(owner_id, &new).await?;

        info!(prediction_id = %prediction.id, "prediction recorded");
        Ok(prediction)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, owner_id: Uuid) -> AppResult<Vec<Prediction>> {
        self.repo.list_for_owner(owner_id).await
    }

    /// Missing and not-owned records both answer `NotFound`.
    #[instrument(skip(self))]
    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> AppResult<Prediction> {
        self.repo
            .get_for_owner(owner_id, id)
            .await?
            .ok_or(AppError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()> {
        if self.repo.delete_for_owner(owner_id, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> AppResult<Vec<PredictionWithOwner>> {
        self.repo.list_all_with_owner().await
    }
}
