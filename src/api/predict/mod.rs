// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction API endpoint module
//!
//! Provides POST /api/predict for diagnosing crop disease from image URLs.

pub mod handler;
pub mod request;

pub use crate::diagnosis::{PredictionDetails, PredictionResponse};
pub use handler::predict_handler;
pub use request::PredictRequest;
