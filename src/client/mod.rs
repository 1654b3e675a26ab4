// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod assessment_client;

pub use assessment_client::{
    simulate_assessment, AssessmentClient, AssessmentResult, SIMULATED_MODEL_VERSION,
};
