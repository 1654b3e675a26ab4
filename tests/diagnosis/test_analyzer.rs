// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! CropAnalyzer tests with a mocked classifier

use farmer_shield_ai::{
    diagnosis::{ClassCatalog, CropAnalyzer, ImageFailure, SeverityTable},
    vision::{ClassifierError, ImageClassifier, ImageFetcher, DEFAULT_FETCH_TIMEOUT},
};
use image::{Rgb, RgbImage};
use mockall::mock;
use ndarray::Array4;
use std::sync::Arc;

mock! {
    pub Classifier {}

    impl ImageClassifier for Classifier {
        fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>, ClassifierError>;
        fn num_classes(&self) -> usize;
    }
}

fn catalog() -> ClassCatalog {
    ClassCatalog::new([
        "Peach___Bacterial_spot",
        "Peach___healthy",
        "Squash___Powdery_mildew",
    ])
}

fn analyzer(mock: MockClassifier) -> CropAnalyzer {
    CropAnalyzer::new(
        catalog(),
        SeverityTable::default(),
        ImageFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap(),
        Arc::new(mock),
    )
}

#[test]
fn test_classifier_receives_normalized_tensor() {
    let mut mock = MockClassifier::new();
    mock.expect_num_classes().return_const(3usize);
    mock.expect_classify()
        .times(1)
        .withf(|input| input.shape() == [1, 3, 224, 224])
        .returning(|_| Ok(vec![0.1, 0.2, 0.7]));

    let image = RgbImage::from_pixel(500, 375, Rgb([90, 160, 70]));
    let prediction = analyzer(mock).classify_image(&image).unwrap().unwrap();

    assert_eq!(prediction.class_name, "Squash___Powdery_mildew");
    assert!((prediction.confidence - 70.0).abs() < 1e-3);
}

#[test]
fn test_classifier_error_propagates() {
    let mut mock = MockClassifier::new();
    mock.expect_num_classes().return_const(3usize);
    mock.expect_classify()
        .returning(|_| Err(ClassifierError::Inference("session poisoned".to_string())));

    let image = RgbImage::from_pixel(256, 256, Rgb([0, 0, 0]));
    let result = analyzer(mock).classify_image(&image);

    assert!(matches!(result, Err(ClassifierError::Inference(_))));
}

#[test]
fn test_zero_sized_image_is_per_image_failure() {
    let mut mock = MockClassifier::new();
    mock.expect_num_classes().return_const(3usize);
    mock.expect_classify().never();

    let image = RgbImage::new(0, 0);
    let outcome = analyzer(mock).classify_image(&image).unwrap();

    assert!(matches!(outcome, Err(ImageFailure::Preprocess(_))));
}

#[tokio::test]
async fn test_unfetchable_urls_never_reach_classifier() {
    let mut mock = MockClassifier::new();
    mock.expect_num_classes().return_const(3usize);
    mock.expect_classify().never();

    let response = analyzer(mock)
        .analyze(&[
            "".to_string(),
            "mailto:farmer@example.com".to_string(),
            "http://127.0.0.1:9/leaf.png".to_string(),
        ])
        .await
        .unwrap();

    assert_eq!(response.analysis_count, 0);
    assert_eq!(response.disease_detected, "Unable to process images");
    assert!(response.details.is_none());
}
