// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crop disease diagnosis: class catalog, severity policy and aggregation

pub mod aggregator;
pub mod analyzer;
pub mod catalog;
pub mod severity;
pub mod types;

pub use aggregator::{aggregate, empty_response, NO_ANALYSIS_SENTINEL};
pub use analyzer::{classify_image, CropAnalyzer};
pub use catalog::{display_name, ClassCatalog, LABEL_DELIMITER, PLANT_VILLAGE_CLASSES};
pub use severity::{SeverityEntry, SeverityTable, CONFIDENCE_PROXY_CAP, DEFAULT_SEVERITIES};
pub use types::{ImageFailure, ImageOutcome, Prediction, PredictionDetails, PredictionResponse};
