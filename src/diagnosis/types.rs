// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for crop disease analysis

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vision::{FetchError, PreprocessError};

/// Top classification of a single image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Full catalog label, e.g. `Tomato___Late_blight`
    #[serde(rename = "class")]
    pub class_name: String,
    /// Probability of the top class as a percentage (0-100)
    pub confidence: f64,
}

/// Reason an image was dropped from the analysis
#[derive(Debug, Error)]
pub enum ImageFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
}

/// Result of processing one image URL
#[derive(Debug)]
pub enum ImageOutcome {
    Classified(Prediction),
    Failed { url: String, reason: ImageFailure },
}

impl ImageOutcome {
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            ImageOutcome::Classified(prediction) => Some(prediction),
            ImageOutcome::Failed { .. } => None,
        }
    }
}

/// Extra information attached to successful analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDetails {
    pub all_predictions: Vec<Prediction>,
    pub model_accuracy: String,
    pub dataset: String,
}

/// Aggregated analysis returned by `POST /api/predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub damage_percentage: f64,
    pub disease_detected: String,
    pub model_version: String,
    pub confidence: f64,
    pub analysis_count: usize,
    #[serde(default)]
    pub details: Option<PredictionDetails>,
}
