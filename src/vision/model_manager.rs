// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Loads the plant disease classifier once at startup

use std::sync::Arc;

use super::classifier::{ImageClassifier, OnnxPlantClassifier};

/// Configuration for loading the classifier model
#[derive(Debug, Clone)]
pub struct ClassifierModelConfig {
    /// Path to the ONNX model file (optional)
    pub model_path: Option<String>,
    /// Number of classes the model was trained on
    pub num_classes: usize,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

impl Default for ClassifierModelConfig {
    fn default() -> Self {
        Self {
            model_path: Some("./models/resnet50-plantvillage.onnx".to_string()),
            num_classes: 38,
            intra_threads: 4,
        }
    }
}

/// Information about the classifier model
#[derive(Debug, Clone)]
pub struct ClassifierModelInfo {
    pub name: String,
    pub available: bool,
}

/// Holds the loaded classifier, if any.
///
/// A missing model is not fatal: the service starts and prediction requests
/// answer 503 until a model is provided.
pub struct ClassifierModelManager {
    classifier: Option<Arc<dyn ImageClassifier>>,
}

impl ClassifierModelManager {
    pub fn new(config: ClassifierModelConfig) -> Self {
        let classifier = match config.model_path {
            Some(ref path) => {
                match OnnxPlantClassifier::new(path, config.num_classes, config.intra_threads) {
                    Ok(model) => {
                        tracing::info!("✅ Classifier model loaded from {}", path);
                        Some(Arc::new(model) as Arc<dyn ImageClassifier>)
                    }
                    Err(e) => {
                        tracing::warn!("⚠️ Failed to load classifier model from {}: {:#}", path, e);
                        None
                    }
                }
            }
            None => None,
        };

        Self { classifier }
    }

    /// Wrap an already constructed classifier
    pub fn with_classifier(classifier: Arc<dyn ImageClassifier>) -> Self {
        Self {
            classifier: Some(classifier),
        }
    }

    pub fn get_classifier(&self) -> Option<Arc<dyn ImageClassifier>> {
        self.classifier.clone()
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn model_info(&self) -> ClassifierModelInfo {
        ClassifierModelInfo {
            name: crate::version::MODEL_VERSION.to_string(),
            available: self.classifier.is_some(),
        }
    }
}
