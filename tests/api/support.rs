// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures: a local image host and scripted classifiers
#![allow(dead_code)]

use axum::{http::header, response::IntoResponse, routing::get, Router};
use farmer_shield_ai::{
    api::AppState,
    diagnosis::{ClassCatalog, SeverityTable},
    vision::{ClassifierError, ClassifierModelManager, ImageClassifier, ImageFetcher},
};
use image::{ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Returns one scripted probability vector per call
pub struct ScriptedClassifier {
    outputs: Mutex<VecDeque<Vec<f32>>>,
    num_classes: usize,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new(num_classes: usize, outputs: Vec<Vec<f32>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            num_classes,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageClassifier for ScriptedClassifier {
    fn classify(&self, _input: &Array4<f32>) -> Result<Vec<f32>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ClassifierError::Inference("script exhausted".to_string()))
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }
}

/// Probability vector with `peak` at `index` and the rest spread evenly
pub fn peaked(num_classes: usize, index: usize, peak: f32) -> Vec<f32> {
    let rest = (1.0 - peak) / (num_classes - 1) as f32;
    let mut probs = vec![rest; num_classes];
    probs[index] = peak;
    probs
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, 140, (y % 256) as u8])
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// Serve test images on an ephemeral port and return its base URL.
///
/// Routes: `/leaf.png` (valid image), `/strip.png` (valid 1x60000 image),
/// `/notes.txt` (text body). Anything else is a 404.
pub async fn spawn_image_host() -> String {
    let png = png_bytes(320, 240);
    let strip = png_bytes(1, 60_000);
    let app = Router::new()
        .route(
            "/leaf.png",
            get(move || {
                let png = png.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], png).into_response() }
            }),
        )
        .route(
            "/strip.png",
            get(move || {
                let strip = strip.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], strip).into_response() }
            }),
        )
        .route("/notes.txt", get(|| async { "not a picture" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn state_with(catalog: ClassCatalog, classifier: Arc<ScriptedClassifier>) -> AppState {
    let fetcher = ImageFetcher::new(Duration::from_secs(5)).unwrap();
    let manager = ClassifierModelManager::with_classifier(classifier);
    AppState::from_components(&manager, catalog, SeverityTable::default(), fetcher)
}

/// Index of `label` in the PlantVillage catalog
pub fn plant_village_index(label: &str) -> usize {
    ClassCatalog::plant_village()
        .labels()
        .position(|l| l == label)
        .unwrap()
}
