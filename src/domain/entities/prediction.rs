use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// Verdict of a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Fake,
    Real,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fake => "FAKE",
            Label::Real => "REAL",
        }
    }
}

impl Default for Label {
    fn default() -> Self {
        Label::Fake
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FAKE" => Ok(Label::Fake),
            "REAL" => Ok(Label::Real),
            other => Err(format!("unknown label: {other}")),
        }
    }
}

/// Which model produced the final verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Ensemble,
    Classical,
    Transformer,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Ensemble => "ensemble",
            ModelKind::Classical => "classical",
            ModelKind::Transformer => "transformer",
        }
    }
}

impl Default for ModelKind {
    fn default() -> Self {
        ModelKind::Ensemble
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ensemble" => Ok(ModelKind::Ensemble),
            "classical" => Ok(ModelKind::Classical),
            "transformer" => Ok(ModelKind::Transformer),
            other => Err(format!("unknown model: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassProbabilities {
    pub fake: f64,
    pub real: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubModelOutput {
    pub label: Label,
    pub confidence: f64,
    #[serde(default)]
    pub probabilities: ClassProbabilities,
}

/// Per-model raw outputs stored alongside a prediction.
///
/// Keys:
/// - `classical`: the TF-IDF + random forest classifier
/// - `transformer`: the fine-tuned transformer classifier
/// - `confidenceNote`: free-text reliability note from the ensemble
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SubModelOutputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classical: Option<SubModelOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformer: Option<SubModelOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_note: Option<String>,
}

impl SubModelOutputs {
    /// Every score that must lie in `[0, 1]`: each confidence and class probability.
    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.classical
            .iter()
            .chain(self.transformer.iter())
            .flat_map(|o| [o.confidence, o.probabilities.fake, o.probabilities.real])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub model_used: ModelKind,
    pub final_label: Label,
    pub final_confidence: f64,
    pub sub_model_outputs: SubModelOutputs,
    pub external_prediction_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A prediction about to be recorded. The owner is supplied separately.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrediction {
    pub text: String,
    #[serde(default)]
    pub model_used: ModelKind,
    #[serde(default)]
    pub final_label: Label,
    #[serde(default)]
    pub final_confidence: f64,
    #[serde(default)]
    pub sub_model_outputs: SubModelOutputs,
    #[serde(default)]
    pub external_prediction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerSummary {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Prediction annotated with its owner, for the admin listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionWithOwner {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub owner: Option<OwnerSummary>,
}
