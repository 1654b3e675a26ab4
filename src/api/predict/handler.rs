// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction endpoint handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{debug, error, warn};

use super::request::PredictRequest;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::diagnosis::PredictionResponse;

/// POST /api/predict - Diagnose crop disease from image URLs
///
/// # Request
/// - `image_urls`: Ordered list of image URLs (at least one)
///
/// # Response
/// - `damage_percentage`: Estimated damage (0-100) for the first analyzed image
/// - `disease_detected`: Human-readable class of the first analyzed image
/// - `model_version`: Classifier identifier
/// - `confidence`: Mean top-class confidence over analyzed images (0-100)
/// - `analysis_count`: Number of images that were analyzed
/// - `details`: Raw predictions and model metadata, null when nothing was analyzed
///
/// # Errors
/// - 400 Bad Request: body is not JSON, `image_urls` is missing, or it is empty
/// - 503 Service Unavailable: classifier model not loaded
/// - 500 Internal Server Error: classifier failed
///
/// Unreachable or undecodable images are skipped; if all of them fail the
/// response is still 200 with `analysis_count = 0`.
pub async fn predict_handler(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Malformed prediction request: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;
    debug!("Prediction request received for {} URLs", request.image_urls.len());

    if let Err(e) = request.validate() {
        warn!("Prediction validation failed: {}", e);
        return Err(e);
    }

    let analyzer = state.analyzer.as_ref().ok_or_else(|| {
        warn!("Classifier model not loaded");
        ApiError::ServiceUnavailable("Classifier model not loaded".to_string())
    })?;

    let response = analyzer.analyze(&request.image_urls).await.map_err(|e| {
        error!("Classification failed: {}", e);
        ApiError::InternalError(format!("Classification failed: {}", e))
    })?;

    Ok(Json(response))
}
