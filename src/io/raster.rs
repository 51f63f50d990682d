// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop rasterization.
//!
//! Maps the display-space crop rectangle onto the natural-resolution source
//! image, copies that region 1:1 into a fresh surface and encodes it as JPEG.

use crate::models::crop::CropRect;
use crate::models::display::DisplayGeometry;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

/// Media type of every artifact produced here.
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// Region of the source image to copy, in natural pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// An encoded crop ready to hand back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("JPEG encoding failed: {0}")]
    EncodeFailed(String),
}

/// Round half to even into a pixel count.
fn to_pixels(value: f64) -> Option<u32> {
    let rounded = value.round_ties_even();
    (rounded.is_finite() && rounded >= 0.0 && rounded <= u32::MAX as f64).then_some(rounded as u32)
}

fn to_natural(value: f64, natural: u32, display: f64) -> f64 {
    value * natural as f64 / display
}

/// Compute the natural-space region for `rect`.
///
/// The output size is the rounded scaled size. The origin is pulled back if
/// rounding would push the region past the far edge of the source.
pub fn source_region(rect: &CropRect, geometry: &DisplayGeometry) -> Result<SourceRegion, RasterError> {
    let nw = geometry.natural_width;
    let nh = geometry.natural_height;
    let (dw, dh) = (geometry.display_width, geometry.display_height);

    let invalid = || RasterError::SurfaceUnavailable(format!("crop rectangle {rect:?} does not map to source pixels"));

    let width = to_pixels(to_natural(rect.width, nw, dw)).ok_or_else(invalid)?;
    let height = to_pixels(to_natural(rect.height, nh, dh)).ok_or_else(invalid)?;
    let x = to_pixels(to_natural(rect.x, nw, dw)).ok_or_else(invalid)?;
    let y = to_pixels(to_natural(rect.y, nh, dh)).ok_or_else(invalid)?;

    if width == 0 || height == 0 {
        return Err(RasterError::SurfaceUnavailable(format!(
            "empty {width}x{height} output surface"
        )));
    }
    if width > nw || height > nh {
        return Err(RasterError::SurfaceUnavailable(format!(
            "{width}x{height} output exceeds {nw}x{nh} source"
        )));
    }

    Ok(SourceRegion {
        x: x.min(nw - width),
        y: y.min(nh - height),
        width,
        height,
    })
}

/// Suggested file name for the crop of `source_name`.
pub fn output_file_name(source_name: &str) -> String {
    Path::new(source_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(|stem| format!("{stem}-cropped.jpg"))
        .unwrap_or_else(|| "cropped-image.jpg".to_string())
}

/// Crop `source` to `rect` and encode the result.
///
/// Either a complete artifact is returned or an error; nothing partial is
/// ever produced.
pub fn rasterize(
    source: &DynamicImage,
    rect: &CropRect,
    geometry: &DisplayGeometry,
    quality: u8,
    file_name: String,
) -> Result<CroppedImage, RasterError> {
    let region = source_region(rect, geometry)?;

    if region.x + region.width > source.width() || region.y + region.height > source.height() {
        return Err(RasterError::SurfaceUnavailable(format!(
            "source is {}x{}, expected {}x{}",
            source.width(),
            source.height(),
            geometry.natural_width,
            geometry.natural_height
        )));
    }

    let surface = source
        .crop_imm(region.x, region.y, region.width, region.height)
        .to_rgb8();

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode_image(&surface)
        .map_err(|e| RasterError::EncodeFailed(e.to_string()))?;

    if bytes.is_empty() {
        return Err(RasterError::EncodeFailed("encoder produced no data".to_string()));
    }

    log::debug!(
        "Rasterized {:?} to {} bytes of {}",
        region,
        bytes.len(),
        JPEG_MEDIA_TYPE
    );

    Ok(CroppedImage {
        bytes,
        media_type: JPEG_MEDIA_TYPE,
        file_name,
        width: region.width,
        height: region.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn geometry(nw: u32, nh: u32, dw: f64, dh: f64) -> DisplayGeometry {
        DisplayGeometry {
            natural_width: nw,
            natural_height: nh,
            display_width: dw,
            display_height: dh,
        }
    }

    #[test]
    fn test_region_scales_to_natural_pixels() {
        let geometry = geometry(3000, 2000, 900.0, 600.0);
        let rect = CropRect::new(100.0, 50.0, 300.0, 168.75);
        let region = source_region(&rect, &geometry).unwrap();
        assert_eq!(
            region,
            SourceRegion {
                x: 333,
                y: 167,
                width: 1000,
                height: 562,
            }
        );
    }

    #[test]
    fn test_region_pulled_back_inside_source() {
        let geometry = geometry(1001, 1001, 1000.0, 1000.0);
        let rect = CropRect::new(500.5, 0.0, 500.5, 500.0);
        let region = source_region(&rect, &geometry).unwrap();
        assert!(region.x + region.width <= 1001);
    }

    #[test]
    fn test_empty_region_is_surface_unavailable() {
        let geometry = geometry(3000, 2000, 900.0, 600.0);
        let rect = CropRect::new(10.0, 10.0, 0.1, 0.05);
        assert!(matches!(
            source_region(&rect, &geometry),
            Err(RasterError::SurfaceUnavailable(_))
        ));
    }

    #[test]
    fn test_non_finite_rect_is_surface_unavailable() {
        let geometry = geometry(3000, 2000, 900.0, 600.0);
        let rect = CropRect::new(f64::NAN, 10.0, 100.0, 50.0);
        assert!(matches!(
            source_region(&rect, &geometry),
            Err(RasterError::SurfaceUnavailable(_))
        ));
    }

    #[test]
    fn test_rasterize_output_dimensions() {
        let source = DynamicImage::ImageRgb8(RgbImage::new(3000, 2000));
        let geometry = geometry(3000, 2000, 900.0, 600.0);
        let rect = CropRect::new(100.0, 50.0, 300.0, 168.75);

        let output = rasterize(&source, &rect, &geometry, 90, "photo-cropped.jpg".into()).unwrap();
        assert_eq!((output.width, output.height), (1000, 562));
        assert_eq!(output.media_type, "image/jpeg");
        assert_eq!(output.file_name, "photo-cropped.jpg");

        let decoded = image::load_from_memory(&output.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1000, 562));
    }

    #[test]
    fn test_rasterize_samples_natural_source() {
        let source = RgbImage::from_fn(300, 200, |x, _| {
            if x < 150 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        let source = DynamicImage::ImageRgb8(source);
        let geometry = DisplayGeometry::fit(300, 200, [900.0, 700.0], 0.8);
        let rect = CropRect::new(140.0, 20.0, 80.0, 60.0);

        let output = rasterize(&source, &rect, &geometry, 90, "x.jpg".into()).unwrap();
        assert_eq!((output.width, output.height), (100, 75));

        let decoded = image::load_from_memory(&output.bytes).unwrap().to_rgb8();
        let center = decoded.get_pixel(50, 37);
        assert!(center[2] > 200 && center[0] < 60, "got {center:?}");
    }

    #[test]
    fn test_rasterize_rejects_mismatched_source() {
        let source = DynamicImage::ImageRgb8(RgbImage::new(100, 100));
        let geometry = geometry(3000, 2000, 900.0, 600.0);
        let rect = CropRect::new(100.0, 50.0, 300.0, 168.75);
        let result = rasterize(&source, &rect, &geometry, 90, "x.jpg".into());
        assert!(matches!(result, Err(RasterError::SurfaceUnavailable(_))));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("/tmp/dish.png"), "dish-cropped.jpg");
        assert_eq!(output_file_name("menu.hero.webp"), "menu.hero-cropped.jpg");
        assert_eq!(output_file_name(""), "cropped-image.jpg");
    }
}
