// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop rectangle geometry.
//!
//! Pure functions that turn a pointer delta into a new crop rectangle:
//! translation, aspect-locked resizing per handle, and the boundary
//! correction that keeps the rectangle inside the displayed image without
//! breaking the aspect ratio. Nothing here holds state.

use crate::models::crop::{CropRect, Handle, Point};
use crate::models::display::DisplayGeometry;

/// Size of the displayed image the rectangle must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl From<&DisplayGeometry> for Bounds {
    fn from(geometry: &DisplayGeometry) -> Self {
        Self {
            width: geometry.display_width,
            height: geometry.display_height,
        }
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Handle(Handle),
    Body,
}

/// Which dimension a handle drives directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Width,
    Height,
}

/// Which part of the rectangle stays put while its size changes.
///
/// A size change of `d` moves `x` by `d * x` and `y` by `d * y`: 0 keeps the
/// left/top edge fixed, 1 keeps the right/bottom edge fixed and 0.5 keeps the
/// rectangle centered on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub x: f64,
    pub y: f64,
}

impl Pivot {
    pub const TOP_LEFT: Pivot = Pivot { x: 0.0, y: 0.0 };

    /// The pivot a drag on `handle` resizes around.
    pub fn of(handle: Handle) -> Pivot {
        rule(handle).pivot
    }
}

/// Resize rule for one handle: `drive` maps the pointer delta to a signed
/// growth of the driven axis.
#[derive(Clone, Copy)]
struct HandleRule {
    axis: Axis,
    drive: fn(f64, f64) -> f64,
    pivot: Pivot,
}

/// The larger-magnitude delta wins; ties go to x.
fn dominant(a: f64, b: f64) -> f64 {
    if a.abs() >= b.abs() {
        a
    } else {
        b
    }
}

fn rule(handle: Handle) -> HandleRule {
    match handle {
        Handle::SE => HandleRule {
            axis: Axis::Width,
            drive: |dx, dy| dominant(dx, dy),
            pivot: Pivot { x: 0.0, y: 0.0 },
        },
        Handle::NW => HandleRule {
            axis: Axis::Width,
            drive: |dx, dy| -dominant(dx, dy),
            pivot: Pivot { x: 1.0, y: 1.0 },
        },
        Handle::NE => HandleRule {
            axis: Axis::Width,
            drive: |dx, dy| dominant(dx, -dy),
            pivot: Pivot { x: 0.0, y: 1.0 },
        },
        Handle::SW => HandleRule {
            axis: Axis::Width,
            drive: |dx, dy| dominant(-dx, dy),
            pivot: Pivot { x: 1.0, y: 0.0 },
        },
        Handle::N => HandleRule {
            axis: Axis::Height,
            drive: |_, dy| -dy,
            pivot: Pivot { x: 0.5, y: 1.0 },
        },
        Handle::S => HandleRule {
            axis: Axis::Height,
            drive: |_, dy| dy,
            pivot: Pivot { x: 0.5, y: 0.0 },
        },
        Handle::W => HandleRule {
            axis: Axis::Width,
            drive: |dx, _| -dx,
            pivot: Pivot { x: 1.0, y: 0.5 },
        },
        Handle::E => HandleRule {
            axis: Axis::Width,
            drive: |dx, _| dx,
            pivot: Pivot { x: 0.0, y: 0.5 },
        },
    }
}

/// Clamp `value` into `[0, max]`; an empty range pins to 0.
fn clamp_range(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

/// Move the rectangle by the delta, keeping it inside the bounds.
/// Width and height are never touched.
pub fn translate(rect: &CropRect, dx: f64, dy: f64, bounds: Bounds) -> CropRect {
    CropRect {
        x: clamp_range(rect.x + dx, bounds.width - rect.width),
        y: clamp_range(rect.y + dy, bounds.height - rect.height),
        ..*rect
    }
}

/// Candidate rectangle for dragging `handle` by `(dx, dy)`.
///
/// The result keeps `ratio` and respects the `min_width` floor but may
/// extend outside the image; run it through [`correct_bounds`] before use.
pub fn resize(rect: &CropRect, handle: Handle, dx: f64, dy: f64, ratio: f64, min_width: f64) -> CropRect {
    let rule = rule(handle);
    let drive = (rule.drive)(dx, dy);

    let (width, height) = match rule.axis {
        Axis::Width => {
            let width = (rect.width + drive).max(min_width);
            (width, width / ratio)
        }
        Axis::Height => {
            let height = (rect.height + drive).max(min_width / ratio);
            (height * ratio, height)
        }
    };

    CropRect {
        x: rect.x + (rect.width - width) * rule.pivot.x,
        y: rect.y + (rect.height - height) * rule.pivot.y,
        width,
        height,
    }
}

/// Pull a candidate rectangle back inside the bounds.
///
/// Overflowing edges shrink the rectangle (re-deriving the other side from
/// `ratio`) before the final position clamp, so the ratio survives contact
/// with the image edges. The side re-derived by each step shrinks around
/// `pivot`, which keeps the grabbed handle's opposite edge in place. A
/// rectangle that is already inside comes back unchanged.
pub fn correct_bounds(rect: CropRect, ratio: f64, bounds: Bounds, pivot: Pivot) -> CropRect {
    let mut r = rect;

    if r.x < 0.0 {
        let height = (r.width + r.x) / ratio;
        r.y += (r.height - height) * pivot.y;
        r.width += r.x;
        r.height = height;
        r.x = 0.0;
    }
    if r.y < 0.0 {
        let width = (r.height + r.y) * ratio;
        r.x += (r.width - width) * pivot.x;
        r.height += r.y;
        r.width = width;
        r.y = 0.0;
    }
    if r.right() > bounds.width {
        let width = bounds.width - r.x;
        let height = width / ratio;
        r.y += (r.height - height) * pivot.y;
        r.width = width;
        r.height = height;
    }
    if r.bottom() > bounds.height {
        let height = bounds.height - r.y;
        let width = height * ratio;
        r.x += (r.width - width) * pivot.x;
        r.width = width;
        r.height = height;
    }

    r.x = clamp_range(r.x, bounds.width - r.width);
    r.y = clamp_range(r.y, bounds.height - r.height);
    r
}

/// Centered starting rectangle covering `fill` of the display width, or of
/// the display height when the width-driven height would not fit.
pub fn initial_rect(bounds: Bounds, ratio: f64, fill: f64) -> CropRect {
    let mut width = bounds.width * fill;
    let mut height = width / ratio;
    if height > bounds.height {
        height = bounds.height * fill;
        width = height * ratio;
    }

    CropRect::new((bounds.width - width) / 2.0, (bounds.height - height) / 2.0, width, height)
}

/// Find what lies under `point`: handles within `radius` first (corners
/// before edges), then the body.
pub fn hit_test(rect: &CropRect, point: Point, radius: f64) -> Option<HitTarget> {
    Handle::ALL
        .iter()
        .find(|handle| handle.position(rect).distance(point) <= radius)
        .map(|&handle| HitTarget::Handle(handle))
        .or_else(|| rect.contains(point).then_some(HitTarget::Body))
}
