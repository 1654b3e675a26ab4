// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ImageFetcher tests against a local HTTP host

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use farmer_shield_ai::vision::{image_utils::MAX_IMAGE_SIZE, FetchError, ImageFetcher};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::time::Duration;

fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

async fn spawn_host() -> String {
    let png = encode(&RgbImage::from_pixel(64, 48, Rgb([10, 200, 30])), ImageFormat::Png);
    let jpeg = encode(&RgbImage::from_pixel(40, 30, Rgb([120, 90, 60])), ImageFormat::Jpeg);

    let app = Router::new()
        .route(
            "/leaf.png",
            get(move || {
                let png = png.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], png).into_response() }
            }),
        )
        .route(
            // Wrong content type on purpose: format comes from the bytes
            "/leaf.jpg",
            get(move || {
                let jpeg = jpeg.clone();
                async move { ([(header::CONTENT_TYPE, "text/plain")], jpeg).into_response() }
            }),
        )
        .route("/moved", get(|| async { Redirect::temporary("/leaf.png") }))
        .route("/notes.txt", get(|| async { "field notes" }))
        .route(
            "/huge.png",
            get(|| async { vec![0x89u8; MAX_IMAGE_SIZE + 1] }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/slow.png",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn fetcher() -> ImageFetcher {
    ImageFetcher::new(Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_fetch_png() {
    let host = spawn_host().await;
    let image = fetcher()
        .fetch_rgb(&format!("{}/leaf.png", host))
        .await
        .unwrap();
    assert_eq!(image.dimensions(), (64, 48));
    assert_eq!(image.get_pixel(0, 0), &Rgb([10, 200, 30]));
}

#[tokio::test]
async fn test_format_detected_from_bytes() {
    let host = spawn_host().await;
    let image = fetcher()
        .fetch_rgb(&format!("{}/leaf.jpg", host))
        .await
        .unwrap();
    assert_eq!(image.dimensions(), (40, 30));
}

#[tokio::test]
async fn test_follows_redirect() {
    let host = spawn_host().await;
    let image = fetcher()
        .fetch_rgb(&format!("{}/moved", host))
        .await
        .unwrap();
    assert_eq!(image.dimensions(), (64, 48));
}

#[tokio::test]
async fn test_not_found_is_http_status() {
    let host = spawn_host().await;
    let err = fetcher()
        .fetch_rgb(&format!("{}/nothing.png", host))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_server_error_is_http_status() {
    let host = spawn_host().await;
    let err = fetcher()
        .fetch_rgb(&format!("{}/broken", host))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_non_image_body_is_decode_error() {
    let host = spawn_host().await;
    let err = fetcher()
        .fetch_rgb(&format!("{}/notes.txt", host))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let host = spawn_host().await;
    let err = fetcher()
        .fetch_rgb(&format!("{}/huge.png", host))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FetchError::TooLarge { limit, .. } if limit == MAX_IMAGE_SIZE
    ));
}

#[tokio::test]
async fn test_slow_host_times_out() {
    let host = spawn_host().await;
    let fetcher = ImageFetcher::new(Duration::from_millis(300)).unwrap();
    let err = fetcher
        .fetch_rgb(&format!("{}/slow.png", host))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)));
}

#[tokio::test]
async fn test_refused_connection_is_http_error() {
    let err = fetcher()
        .fetch_rgb("http://127.0.0.1:9/leaf.png")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http(_)));
}

#[tokio::test]
async fn test_non_http_scheme_rejected() {
    let err = fetcher()
        .fetch_rgb("file:///etc/passwd")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl(_)));
}
