// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Plant disease classifier
//!
//! The classifier is treated as a black box behind [`ImageClassifier`]: it
//! takes a preprocessed `[1, 3, 224, 224]` tensor and returns one probability
//! per catalog class. [`OnnxPlantClassifier`] runs a ResNet50 fine-tuned on
//! PlantVillage through ONNX Runtime on CPU.

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::ep::CPU as CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

use super::preprocessing::CLASSIFIER_INPUT_SIZE;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Invalid input shape: {0:?}, expected [1, 3, 224, 224]")]
    InvalidInputShape(Vec<usize>),

    #[error("Classifier produced {actual} scores, expected {expected}")]
    OutputMismatch { expected: usize, actual: usize },

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// A model mapping a normalized image tensor to class probabilities
pub trait ImageClassifier: Send + Sync {
    /// Returns a probability vector aligned with the class catalog
    fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>, ClassifierError>;

    /// Number of classes this model scores
    fn num_classes(&self) -> usize;
}

/// ResNet50 PlantVillage classifier backed by an ONNX Runtime session
#[derive(Clone)]
pub struct OnnxPlantClassifier {
    session: Arc<Mutex<Session>>,
    input_name: String,
    num_classes: usize,
}

impl std::fmt::Debug for OnnxPlantClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPlantClassifier")
            .field("input_name", &self.input_name)
            .field("num_classes", &self.num_classes)
            .finish_non_exhaustive()
    }
}

impl OnnxPlantClassifier {
    /// Load the classifier from an ONNX file.
    ///
    /// The exported model is expected to emit raw logits of length
    /// `num_classes`; softmax is applied here.
    pub fn new<P: AsRef<Path>>(model_path: P, num_classes: usize, intra_threads: usize) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Classifier model not found: {}", model_path.display());
        }

        info!("Loading plant disease classifier from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(ort::Error::<()>::from)
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::<()>::from)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .map_err(ort::Error::<()>::from)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load classifier model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .unwrap_or_else(|| "input".to_string());

        debug!("Classifier input tensor: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            num_classes,
        })
    }
}

impl ImageClassifier for OnnxPlantClassifier {
    fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>, ClassifierError> {
        validate_input_shape(input.shape())?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Inference("session lock poisoned".to_string()))?;

        let input_value = Value::from_array(input.to_owned())
            .map_err(|e| ClassifierError::Inference(format!("Failed to create input tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let logits: Vec<f32> = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("Failed to extract output: {}", e)))?
            .iter()
            .copied()
            .collect();

        if logits.len() != self.num_classes {
            return Err(ClassifierError::OutputMismatch {
                expected: self.num_classes,
                actual: logits.len(),
            });
        }

        Ok(softmax(&logits))
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }
}

fn validate_input_shape(shape: &[usize]) -> Result<(), ClassifierError> {
    let size = CLASSIFIER_INPUT_SIZE as usize;
    if shape != [1, 3, size, size] {
        return Err(ClassifierError::InvalidInputShape(shape.to_vec()));
    }
    Ok(())
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max_logit = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_values: Vec<f32> = logits.iter().map(|&x| (x - max_logit).exp()).collect();
    let sum: f32 = exp_values.iter().sum();
    exp_values.iter().map(|&x| x / sum).collect()
}

/// Index and probability of the highest-scoring class.
///
/// Ties resolve to the lowest index.
pub fn top_class(probabilities: &[f32]) -> Option<(usize, f32)> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (idx, p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((idx, p)),
        })
}
