use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_json_with_fallback},
    app_error::{AppError, AppResult},
    domain::entities::{
        prediction::{
            Label, ModelKind, NewPrediction, OwnerSummary, Prediction, PredictionWithOwner,
        },
        role::Role,
    },
    use_cases::history::PredictionRepo,
};

const PREDICTION_COLUMNS: &str = "p.id, p.user_id, p.text, p.model_used, p.final_label, \
                                  p.final_confidence, p.sub_model_outputs, \
                                  p.external_prediction_id, p.created_at, p.updated_at";

#[derive(sqlx::FromRow, Debug)]
pub struct PredictionDb {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub model_used: String,
    pub final_label: String,
    pub final_confidence: f64,
    pub sub_model_outputs: serde_json::Value,
    pub external_prediction_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Admin listing row: the prediction plus its owner's columns from a LEFT JOIN.
#[derive(sqlx::FromRow, Debug)]
pub struct PredictionWithOwnerDb {
    #[sqlx(flatten)]
    pub prediction: PredictionDb,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
    pub owner_role: Option<String>,
}

fn corrupt(id: Uuid, err: String) -> AppError {
    tracing::error!(prediction_id = %id, error = %err, "Stored prediction is not readable");
    AppError::Database(err)
}

impl TryFrom<PredictionDb> for Prediction {
    type Error = AppError;

    fn try_from(row: PredictionDb) -> Result<Self, Self::Error> {
        let model_used = row
            .model_used
            .parse::<ModelKind>()
            .map_err(|e| corrupt(row.id, e))?;
        let final_label = row
            .final_label
            .parse::<Label>()
            .map_err(|e| corrupt(row.id, e))?;
        let sub_model_outputs = parse_json_with_fallback(
            &row.sub_model_outputs,
            "sub_model_outputs",
            "prediction",
            &row.id.to_string(),
        );
        Ok(Prediction {
            id: row.id,
            user_id: row.user_id,
            text: row.text,
            model_used,
            final_label,
            final_confidence: row.final_confidence,
            sub_model_outputs,
            external_prediction_id: row.external_prediction_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<PredictionWithOwnerDb> for PredictionWithOwner {
    type Error = AppError;

    fn try_from(row: PredictionWithOwnerDb) -> Result<Self, Self::Error> {
        let owner = match (row.owner_name, row.owner_email, row.owner_role) {
            (Some(name), Some(email), Some(role)) => Some(OwnerSummary {
                name,
                email,
                role: role
                    .parse::<Role>()
                    .map_err(|e| corrupt(row.prediction.id, e))?,
            }),
            _ => None,
        };
        Ok(PredictionWithOwner {
            prediction: row.prediction.try_into()?,
            owner,
        })
    }
}

#[async_trait]
impl PredictionRepo for PostgresPersistence {
    async fn insert(&self, owner_id: Uuid, new: &NewPrediction) -> AppResult<Prediction> {
        let sub_model_outputs = serde_json::to_value(&new.sub_model_outputs)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let mut tx = self.pool.begin().await?;

        // Locks the owner row; a deleted owner ends the write here.
        let bumped = sqlx::query(
            "UPDATE users \
             SET total_predictions = total_predictions + 1, \
                 updated_at = (NOW() AT TIME ZONE 'utc') \
             WHERE id = $1",
        )
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;
        if bumped.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        let row = sqlx::query_as::<_, PredictionDb>(&format!(
            "INSERT INTO predictions AS p \
             (id, user_id, text, model_used, final_label, final_confidence, \
              sub_model_outputs, external_prediction_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PREDICTION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&new.text)
        .bind(new.model_used.as_str())
        .bind(new.final_label.as_str())
        .bind(new.final_confidence)
        .bind(sub_model_outputs)
        .bind(&new.external_prediction_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> AppResult<Vec<Prediction>> {
        sqlx::query_as::<_, PredictionDb>(&format!(
            "SELECT {PREDICTION_COLUMNS} FROM predictions p \
             WHERE p.user_id = $1 ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Prediction::try_from)
        .collect()
    }

    async fn get_for_owner(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Prediction>> {
        sqlx::query_as::<_, PredictionDb>(&format!(
            "SELECT {PREDICTION_COLUMNS} FROM predictions p \
             WHERE p.id = $1 AND p.user_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Prediction::try_from)
        .transpose()
    }

    async fn delete_for_owner(&self, owner_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM predictions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all_with_owner(&self) -> AppResult<Vec<PredictionWithOwner>> {
        sqlx::query_as::<_, PredictionWithOwnerDb>(&format!(
            "SELECT {PREDICTION_COLUMNS}, \
                    u.name AS owner_name, u.email AS owner_email, u.role AS owner_role \
             FROM predictions p LEFT JOIN users u ON u.id = p.user_id \
             ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(PredictionWithOwner::try_from)
        .collect()
    }
}
