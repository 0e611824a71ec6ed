use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::models::City;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

/// GET /api/cities
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<City>>> {
    Ok(Json(state.store.list().await?))
}

/// GET /api/cities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<City>> {
    state
        .store
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::city_not_found)
}

/// POST /api/cities
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<City>)> {
    let Json(payload) = payload?;
    let city = state.store.create(payload).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

/// PUT /api/cities/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<City>> {
    let Json(payload) = payload?;
    Ok(Json(state.store.update(&id, payload).await?))
}

/// DELETE /api/cities/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::city_not_found())
    }
}
