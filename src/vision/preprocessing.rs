// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the ResNet50 classifier

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;
use thiserror::Error;

/// Shorter side length after the first resize
pub const RESIZE_SHORTER_SIDE: u32 = 256;

/// Side length of the square center crop fed to the classifier
pub const CLASSIFIER_INPUT_SIZE: u32 = 224;

/// ImageNet normalization mean values
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet normalization std values
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Upper bound on the long side after the first resize (aspect ratio 64:1)
pub const MAX_RESIZED_LONG_SIDE: u32 = RESIZE_SHORTER_SIDE * 64;

#[derive(Debug, Error, PartialEq)]
pub enum PreprocessError {
    #[error("Image has zero size: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Image aspect ratio too extreme: {width}x{height}")]
    ExtremeAspectRatio { width: u32, height: u32 },
}

/// Preprocess an RGB image into the classifier input tensor
///
/// Steps:
/// 1. Resize so the shorter side is 256, keeping aspect ratio (bilinear)
/// 2. Center crop to 224x224
/// 3. Scale to [0, 1] and normalize: (pixel/255 - mean) / std
/// 4. Emit NCHW tensor [1, 3, 224, 224]
pub fn preprocess_for_classifier(image: &RgbImage) -> Result<Array4<f32>, PreprocessError> {
    let resized = resize_shorter_side(image, RESIZE_SHORTER_SIDE)?;
    let cropped = center_crop(&resized, CLASSIFIER_INPUT_SIZE);

    let size = CLASSIFIER_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for y in 0..size {
        for x in 0..size {
            let pixel = cropped.get_pixel(x as u32, y as u32);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
            }
        }
    }

    Ok(tensor)
}

/// Resize so that the shorter side equals `target`.
///
/// The longer side is scaled proportionally and truncated, so a 300x400 image
/// becomes 256x341. Images whose scaled long side would exceed
/// [`MAX_RESIZED_LONG_SIDE`] are rejected before anything is allocated.
pub fn resize_shorter_side(image: &RgbImage, target: u32) -> Result<RgbImage, PreprocessError> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(PreprocessError::EmptyImage {
            width: w,
            height: h,
        });
    }

    let (short, long) = if w <= h { (w, h) } else { (h, w) };
    let scaled_long = u32::try_from(u64::from(target) * u64::from(long) / u64::from(short))
        .ok()
        .filter(|side| *side <= MAX_RESIZED_LONG_SIDE.max(target))
        .ok_or(PreprocessError::ExtremeAspectRatio {
            width: w,
            height: h,
        })?;

    let (new_w, new_h) = if w <= h {
        (target, scaled_long)
    } else {
        (scaled_long, target)
    };

    if (new_w, new_h) == (w, h) {
        return Ok(image.clone());
    }

    Ok(imageops::resize(image, new_w, new_h, FilterType::Triangle))
}

/// Crop a `size`x`size` square from the center of the image.
///
/// Offsets are rounded half-to-even; images smaller than `size` are cropped
/// to what is available.
pub fn center_crop(image: &RgbImage, size: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    let left = (w.saturating_sub(size) as f64 / 2.0).round_ties_even() as u32;
    let top = (h.saturating_sub(size) as f64 / 2.0).round_ties_even() as u32;

    imageops::crop_imm(image, left, top, size.min(w), size.min(h)).to_image()
}
