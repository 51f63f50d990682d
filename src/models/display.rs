// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Display geometry of a loaded source image.
//!
//! The crop tool works on a downscaled display copy of the source. This
//! module computes that size once per image load.

/// Natural and on-screen dimensions of the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub natural_width: u32,
    pub natural_height: u32,
    pub display_width: f64,
    pub display_height: f64,
}

impl DisplayGeometry {
    /// Fit the natural size inside `bounding_box`, never scaling above
    /// `headroom` of the natural size. Display sizes are whole units.
    pub fn fit(natural_width: u32, natural_height: u32, bounding_box: [f64; 2], headroom: f64) -> Self {
        let natural_width = natural_width.max(1);
        let natural_height = natural_height.max(1);
        let nw = natural_width as f64;
        let nh = natural_height as f64;

        let scale = (bounding_box[0] / nw).min(bounding_box[1] / nh).min(headroom);

        Self {
            natural_width,
            natural_height,
            display_width: (nw * scale).round().max(1.0),
            display_height: (nh * scale).round().max(1.0),
        }
    }

    /// Natural pixels per display unit, `(x, y)`.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.natural_width as f64 / self.display_width,
            self.natural_height as f64 / self.display_height,
        )
    }
}
