// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop data structures.
//!
//! This module defines the display-space point and rectangle types, the
//! fixed aspect ratio modes and the eight resize handles.

use serde::{Deserialize, Serialize};

/// A 2D point in display-space units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The crop rectangle, top-left origin, in display-space units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the point lies inside the rectangle (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Fixed aspect ratio a crop session is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectMode {
    /// 4:3, used for list thumbnails.
    #[default]
    Thumbnail,
    /// 16:9, used for cover images.
    Cover,
}

impl AspectMode {
    pub const ALL: [AspectMode; 2] = [AspectMode::Thumbnail, AspectMode::Cover];

    /// Width over height.
    pub fn ratio(self) -> f64 {
        match self {
            AspectMode::Thumbnail => 4.0 / 3.0,
            AspectMode::Cover => 16.0 / 9.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AspectMode::Thumbnail => "Thumbnail 4:3",
            AspectMode::Cover => "Cover 16:9",
        }
    }
}

/// One of the eight grab points on the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Handle {
    /// Corners first so they win over edge midpoints when hit-testing.
    pub const ALL: [Handle; 8] = [
        Handle::NW,
        Handle::NE,
        Handle::SW,
        Handle::SE,
        Handle::N,
        Handle::S,
        Handle::W,
        Handle::E,
    ];

    /// Location of this handle on the given rectangle.
    pub fn position(self, rect: &CropRect) -> Point {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            Handle::N => Point::new(cx, rect.y),
            Handle::S => Point::new(cx, rect.bottom()),
            Handle::E => Point::new(rect.right(), cy),
            Handle::W => Point::new(rect.x, cy),
            Handle::NE => Point::new(rect.right(), rect.y),
            Handle::NW => Point::new(rect.x, rect.y),
            Handle::SE => Point::new(rect.right(), rect.bottom()),
            Handle::SW => Point::new(rect.x, rect.bottom()),
        }
    }
}
