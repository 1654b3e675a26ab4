// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod diagnosis;
pub mod version;
pub mod vision;

pub use api::{create_router, start_server, AppState};
pub use client::{AssessmentClient, AssessmentResult};
pub use config::ServiceConfig;
pub use diagnosis::{ClassCatalog, CropAnalyzer, PredictionResponse, SeverityTable};
pub use vision::{ClassifierModelManager, ImageClassifier, ImageFetcher};
