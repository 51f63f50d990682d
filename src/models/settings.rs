// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop tool settings.
//!
//! Tunables for display fitting, interaction and encoding. Every field has a
//! default so partial settings files are accepted.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Complete settings for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropSettings {
    /// Box the display copy must fit in, `[width, height]`.
    pub bounding_box: [f64; 2],
    /// Upper bound on the display scale relative to natural size.
    pub display_headroom: f64,
    /// Fraction of the display the initial rectangle fills.
    pub initial_fill: f64,
    /// Minimum crop width in display units.
    pub min_dimension: f64,
    /// Distance beyond the image edges that aborts an interaction.
    pub escape_margin: f64,
    /// Hit radius of the resize handles.
    pub handle_radius: f64,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            bounding_box: [900.0, 700.0],
            display_headroom: 0.8,
            initial_fill: 0.8,
            min_dimension: 20.0,
            escape_margin: 150.0,
            handle_radius: 10.0,
            jpeg_quality: 90,
        }
    }
}

impl CropSettings {
    /// Reject values the geometry cannot work with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.bounding_box[0] > 0.0 && self.bounding_box[1] > 0.0,
            "bounding_box must be positive, got {:?}",
            self.bounding_box
        );
        ensure!(
            self.display_headroom > 0.0,
            "display_headroom must be positive, got {}",
            self.display_headroom
        );
        ensure!(
            self.initial_fill > 0.0 && self.initial_fill <= 1.0,
            "initial_fill must be in (0, 1], got {}",
            self.initial_fill
        );
        ensure!(
            self.min_dimension > 0.0,
            "min_dimension must be positive, got {}",
            self.min_dimension
        );
        ensure!(
            self.escape_margin >= 0.0,
            "escape_margin must not be negative, got {}",
            self.escape_margin
        );
        ensure!(
            (1..=100).contains(&self.jpeg_quality),
            "jpeg_quality must be in 1..=100, got {}",
            self.jpeg_quality
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CropSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_quality() {
        let settings = CropSettings {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_bounding_box() {
        let settings = CropSettings {
            bounding_box: [0.0, 700.0],
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
