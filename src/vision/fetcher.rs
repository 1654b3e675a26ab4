// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP image download with a fixed per-request timeout

use image::RgbImage;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::image_utils::{decode_rgb_image, ImageError, MAX_IMAGE_SIZE};

/// Default timeout for a single image download
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    #[error("Timeout fetching: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status} for: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Image from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },

    #[error("Undecodable image from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: ImageError,
    },
}

/// Downloads images and decodes them to RGB.
///
/// No retries: a failed or slow host costs at most one timeout per URL.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("farmer-shield-ai/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch a single image and decode it into an RGB pixel grid
    pub async fn fetch_rgb(&self, url: &str) -> Result<RgbImage, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if !["http", "https"].contains(&parsed.scheme()) {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        debug!("Fetching image from: {}", url);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| transport_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = read_capped_body(response, url).await?;

        let (image, info) = decode_rgb_image(&bytes).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

        debug!(
            "Decoded {:?} image {}x{} ({} bytes) from {}",
            info.format, info.width, info.height, info.size_bytes, url
        );

        Ok(image)
    }
}

/// Read the body, refusing anything over `MAX_IMAGE_SIZE` before buffering it
async fn read_capped_body(mut response: reqwest::Response, url: &str) -> Result<Vec<u8>, FetchError> {
    let too_large = || FetchError::TooLarge {
        url: url.to_string(),
        limit: MAX_IMAGE_SIZE,
    };

    if response
        .content_length()
        .is_some_and(|len| len > MAX_IMAGE_SIZE as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| transport_error(e, url))?
    {
        if body.len() + chunk.len() > MAX_IMAGE_SIZE {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

fn transport_error(e: reqwest::Error, url: &str) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::Http(e.to_string())
    }
}
