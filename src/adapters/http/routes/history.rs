use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::{AuthContext, authenticate, require_admin},
    },
    app_error::{AppError, AppResult},
    domain::entities::prediction::NewPrediction,
};

#[derive(Serialize)]
struct ListResponse<T> {
    success: bool,
    count: usize,
    data: Vec<T>,
}

impl<T> ListResponse<T> {
    fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Serialize)]
struct ItemResponse<T> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

pub fn router(app_state: &AppState) -> Router<AppState> {
    let admin_only = Router::new()
        .route("/admin/all", get(list_all))
        .route_layer(from_fn(require_admin));

    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).delete(delete_one))
        .merge(admin_only)
        .route_layer(from_fn_with_state(app_state.clone(), authenticate))
}

async fn create(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<NewPrediction>,
) -> AppResult<impl IntoResponse> {
    let prediction = app_state
        .history_use_cases
        .record(ctx.user_id(), payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemResponse {
            success: true,
            data: prediction,
        }),
    ))
}

async fn list(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> AppResult<impl IntoResponse> {
    let predictions = app_state.history_use_cases.list(ctx.user_id()).await?;
    Ok(Json(ListResponse::new(predictions)))
}

async fn get_one(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let prediction = app_state
        .history_use_cases
        .get(ctx.user_id(), parse_record_id(&id)?)
        .await?;
    Ok(Json(ItemResponse {
        success: true,
        data: prediction,
    }))
}

async fn delete_one(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    app_state
        .history_use_cases
        .delete(ctx.user_id(), parse_record_id(&id)?)
        .await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Prediction deleted",
    }))
}

async fn list_all(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let predictions = app_state.history_use_cases.list_all().await?;
    Ok(Json(ListResponse::new(predictions)))
}

/// An id that cannot name a record is answered like one that names nothing.
fn parse_record_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}
