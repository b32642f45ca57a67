//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::domain::entities::{
    prediction::{
        ClassProbabilities, Label, ModelKind, NewPrediction, Prediction, SubModelOutput,
        SubModelOutputs,
    },
    role::Role,
    user::User,
};

/// Create a test user with sensible defaults.
///
/// The password hash is not a valid PHC string, so the account cannot log in
/// unless a test overrides it with `hash_password(..)`.
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let id = Uuid::new_v4();
    let mut user = User {
        id,
        name: "Test User".to_string(),
        email: format!("user-{}@example.com", id.simple()),
        password_hash: "unusable".to_string(),
        role: Role::User,
        last_login_at: None,
        total_predictions: 0,
        created_at: test_datetime(),
        updated_at: test_datetime(),
    };
    overrides(&mut user);
    user
}

/// Create a test admin with sensible defaults.
pub fn create_test_admin(overrides: impl FnOnce(&mut User)) -> User {
    create_test_user(|u| {
        u.name = "Test Admin".to_string();
        u.role = Role::Admin;
        overrides(u);
    })
}

/// Create a prediction payload with sensible defaults.
pub fn create_test_new_prediction(overrides: impl FnOnce(&mut NewPrediction)) -> NewPrediction {
    let mut new = NewPrediction {
        text: "Scientists confirm the moon is made of cheese".to_string(),
        model_used: ModelKind::Ensemble,
        final_label: Label::Fake,
        final_confidence: 0.92,
        sub_model_outputs: SubModelOutputs {
            classical: Some(SubModelOutput {
                label: Label::Fake,
                confidence: 0.88,
                probabilities: ClassProbabilities {
                    fake: 0.88,
                    real: 0.12,
                },
            }),
            transformer: Some(SubModelOutput {
                label: Label::Fake,
                confidence: 0.95,
                probabilities: ClassProbabilities {
                    fake: 0.95,
                    real: 0.05,
                },
            }),
            confidence_note: Some("High confidence prediction".to_string()),
        },
        external_prediction_id: None,
    };
    overrides(&mut new);
    new
}

/// Create a stored prediction owned by `owner_id`.
pub fn create_test_prediction(
    owner_id: Uuid,
    overrides: impl FnOnce(&mut Prediction),
) -> Prediction {
    let new = create_test_new_prediction(|_| {});
    let mut prediction = Prediction {
        id: Uuid::new_v4(),
        user_id: owner_id,
        text: new.text,
        model_used: new.model_used,
        final_label: new.final_label,
        final_confidence: new.final_confidence,
        sub_model_outputs: new.sub_model_outputs,
        external_prediction_id: new.external_prediction_id,
        created_at: test_datetime(),
        updated_at: test_datetime(),
    };
    overrides(&mut prediction);
    prediction
}

/// Fixed timestamp for deterministic fixtures.
pub fn test_datetime() -> NaiveDateTime {
    chrono::DateTime::from_timestamp(1_735_689_600, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}
