// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Source image loading.
//!
//! This module decodes image files and builds the downscaled RGBA preview
//! egui displays, keeping the full-resolution image for rasterization.

use crate::models::display::DisplayGeometry;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

/// File extensions offered in the open dialog.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "webp"];

/// Display-size RGBA8 copy of a source image.
pub struct Preview {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

/// Decode the image at `path`.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Failed to decode {}", path.display()))
}

/// Scale `image` down to the display size of `geometry`.
pub fn build_preview(image: &DynamicImage, geometry: &DisplayGeometry) -> Preview {
    let width = geometry.display_width as u32;
    let height = geometry.display_height as u32;
    let pixels = image
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgba8()
        .into_raw();

    Preview {
        size: [width as usize, height as usize],
        pixels,
    }
}
