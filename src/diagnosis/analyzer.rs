// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sequential fetch-and-classify loop for one prediction request

use image::RgbImage;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::aggregator::aggregate;
use super::catalog::ClassCatalog;
use super::severity::SeverityTable;
use super::types::{ImageFailure, ImageOutcome, Prediction, PredictionResponse};
use crate::vision::{
    preprocess_for_classifier, top_class, ClassifierError, ImageClassifier, ImageFetcher,
};

/// Read-only state shared by all requests.
///
/// Built once at startup; nothing in here is mutated afterwards.
pub struct CropAnalyzer {
    catalog: ClassCatalog,
    severity: SeverityTable,
    fetcher: ImageFetcher,
    classifier: Arc<dyn ImageClassifier>,
}

impl CropAnalyzer {
    pub fn new(
        catalog: ClassCatalog,
        severity: SeverityTable,
        fetcher: ImageFetcher,
        classifier: Arc<dyn ImageClassifier>,
    ) -> Self {
        if classifier.num_classes() != catalog.len() {
            warn!(
                "Classifier scores {} classes but catalog has {} labels",
                classifier.num_classes(),
                catalog.len()
            );
        }

        Self {
            catalog,
            severity,
            fetcher,
            classifier,
        }
    }

    /// Analyze every URL in order and aggregate the results.
    ///
    /// Images that cannot be fetched, decoded or preprocessed are skipped.
    /// A classifier failure aborts the whole request.
    pub async fn analyze(&self, image_urls: &[String]) -> Result<PredictionResponse, ClassifierError> {
        info!("📸 Analyzing {} images...", image_urls.len());

        let mut outcomes = Vec::with_capacity(image_urls.len());
        for url in image_urls {
            let outcome = self.process_url(url).await?;
            match &outcome {
                ImageOutcome::Classified(prediction) => info!(
                    "  → Detected: {} ({:.1}%)",
                    prediction.class_name, prediction.confidence
                ),
                ImageOutcome::Failed { url, reason } => {
                    warn!("  ⚠️ Failed to process {}: {}", url, reason)
                }
            }
            outcomes.push(outcome);
        }

        let response = aggregate(&outcomes, &self.severity);
        info!(
            "Analysis complete: {}/{} images, damage {:.2}%",
            response.analysis_count,
            image_urls.len(),
            response.damage_percentage
        );

        Ok(response)
    }

    async fn process_url(&self, url: &str) -> Result<ImageOutcome, ClassifierError> {
        let image = match self.fetcher.fetch_rgb(url).await {
            Ok(image) => image,
            Err(e) => {
                return Ok(ImageOutcome::Failed {
                    url: url.to_string(),
                    reason: ImageFailure::Fetch(e),
                })
            }
        };

        match self.classify_image(&image)? {
            Ok(prediction) => Ok(ImageOutcome::Classified(prediction)),
            Err(reason) => Ok(ImageOutcome::Failed {
                url: url.to_string(),
                reason,
            }),
        }
    }

    /// Run preprocessing and classification on a decoded image.
    ///
    /// The outer error is a classifier failure; the inner one is a per-image
    /// failure that only drops this image.
    pub fn classify_image(
        &self,
        image: &RgbImage,
    ) -> Result<Result<Prediction, ImageFailure>, ClassifierError> {
        classify_image(self.classifier.as_ref(), &self.catalog, image)
    }
}

/// Preprocess `image`, run `classifier` and name the top class from `catalog`.
///
/// Same error split as [`CropAnalyzer::classify_image`].
pub fn classify_image(
    classifier: &dyn ImageClassifier,
    catalog: &ClassCatalog,
    image: &RgbImage,
) -> Result<Result<Prediction, ImageFailure>, ClassifierError> {
    let tensor = match preprocess_for_classifier(image) {
        Ok(tensor) => tensor,
        Err(e) => return Ok(Err(ImageFailure::Preprocess(e))),
    };

    let probabilities = classifier.classify(&tensor)?;
    let mismatch = || ClassifierError::OutputMismatch {
        expected: catalog.len(),
        actual: probabilities.len(),
    };
    if probabilities.len() != catalog.len() {
        return Err(mismatch());
    }

    let (index, probability) = top_class(&probabilities).ok_or_else(mismatch)?;
    let class_name = catalog.label(index).ok_or_else(mismatch)?.to_string();

    debug!("Top class #{} {} p={:.4}", index, class_name, probability);

    Ok(Ok(Prediction {
        class_name,
        confidence: (f64::from(probability) * 100.0).clamp(0.0, 100.0),
    }))
}
