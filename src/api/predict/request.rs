// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Request body for `POST /api/predict`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Image URLs, analyzed in order; the first usable one drives the diagnosis
    pub image_urls: Vec<String>,
}

impl PredictRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.image_urls.is_empty() {
            return Err(ApiError::ValidationError {
                field: "image_urls".to_string(),
                message: "No image URLs provided".to_string(),
            });
        }
        Ok(())
    }
}
