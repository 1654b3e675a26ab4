// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Combines per-image outcomes into one response

use super::catalog::display_name;
use super::severity::SeverityTable;
use super::types::{ImageOutcome, Prediction, PredictionDetails, PredictionResponse};
use crate::version::{DATASET, MODEL_ACCURACY, MODEL_VERSION};

/// `disease_detected` value when no image could be analyzed
pub const NO_ANALYSIS_SENTINEL: &str = "Unable to process images";

/// Build the response from the outcomes of one request.
///
/// Only successful outcomes are counted. The first success decides
/// `disease_detected` and `damage_percentage`; every success contributes to
/// the averaged confidence.
pub fn aggregate(outcomes: &[ImageOutcome], severity: &SeverityTable) -> PredictionResponse {
    let predictions: Vec<Prediction> = outcomes
        .iter()
        .filter_map(ImageOutcome::prediction)
        .cloned()
        .collect();

    let Some(primary) = predictions.first() else {
        return empty_response();
    };

    let damage = severity.resolve(&primary.class_name, primary.confidence);
    let avg_confidence =
        predictions.iter().map(|p| p.confidence).sum::<f64>() / predictions.len() as f64;

    PredictionResponse {
        damage_percentage: round2(damage.clamp(0.0, 100.0)),
        disease_detected: display_name(&primary.class_name),
        model_version: MODEL_VERSION.to_string(),
        confidence: round2(avg_confidence.clamp(0.0, 100.0)),
        analysis_count: predictions.len(),
        details: Some(PredictionDetails {
            all_predictions: predictions,
            model_accuracy: MODEL_ACCURACY.to_string(),
            dataset: DATASET.to_string(),
        }),
    }
}

/// Sentinel response for a request where every image failed
pub fn empty_response() -> PredictionResponse {
    PredictionResponse {
        damage_percentage: 0.0,
        disease_detected: NO_ANALYSIS_SENTINEL.to_string(),
        model_version: MODEL_VERSION.to_string(),
        confidence: 0.0,
        analysis_count: 0,
        details: None,
    }
}

/// Two decimals, ties to even
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
