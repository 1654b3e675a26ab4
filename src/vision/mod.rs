// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision pipeline: image download, decoding, preprocessing and classification
//!
//! Everything here runs on CPU. The classifier is loaded once at startup and
//! shared read-only between requests.

pub mod classifier;
pub mod fetcher;
pub mod image_utils;
pub mod model_manager;
pub mod preprocessing;

pub use classifier::{softmax, top_class, ClassifierError, ImageClassifier, OnnxPlantClassifier};
pub use fetcher::{FetchError, ImageFetcher, DEFAULT_FETCH_TIMEOUT};
pub use image_utils::{decode_rgb_image, detect_format, ImageError, ImageInfo};
pub use model_manager::{ClassifierModelConfig, ClassifierModelInfo, ClassifierModelManager};
pub use preprocessing::{preprocess_for_classifier, PreprocessError};
