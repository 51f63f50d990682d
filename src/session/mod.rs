// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop session controller.
//!
//! A session owns the crop rectangle for one source image and turns pointer
//! events into moves and resizes. Pointer positions are display-space
//! coordinates relative to the image's top-left corner.

pub mod capture;

use crate::io::raster::{self, CroppedImage, RasterError};
use crate::models::crop::{AspectMode, CropRect, Handle, Point};
use crate::models::display::DisplayGeometry;
use crate::models::settings::CropSettings;
use crate::util::geometry::{self, Bounds, HitTarget, Pivot};
use capture::PointerCapture;
use image::DynamicImage;

/// What the session is doing, without the capture it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Dragging,
    Resizing(Handle),
}

/// Result of feeding one pointer event to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Ignored,
    Started(InteractionState),
    Moved,
    Resized(Handle),
    Ended,
    /// The pointer went past the escape margin.
    Aborted,
}

enum Interaction<G> {
    Idle,
    Dragging {
        anchor: Point,
        _capture: G,
    },
    Resizing {
        handle: Handle,
        anchor: Point,
        _capture: G,
    },
}

pub struct CropSession<C: PointerCapture> {
    geometry: DisplayGeometry,
    bounds: Bounds,
    aspect: AspectMode,
    min_dimension: f64,
    escape_margin: f64,
    handle_radius: f64,
    jpeg_quality: u8,
    source_name: String,
    rect: CropRect,
    interaction: Interaction<C::Guard>,
    capture: C,
}

impl<C: PointerCapture> CropSession<C> {
    /// Start a session for a source of the given natural size. The
    /// rectangle starts centered per [`geometry::initial_rect`].
    pub fn open(
        natural_width: u32,
        natural_height: u32,
        source_name: impl Into<String>,
        aspect: AspectMode,
        settings: &CropSettings,
        capture: C,
    ) -> Self {
        let geometry = DisplayGeometry::fit(
            natural_width,
            natural_height,
            settings.bounding_box,
            settings.display_headroom,
        );
        let bounds = Bounds::from(&geometry);
        let rect = geometry::correct_bounds(
            geometry::initial_rect(bounds, aspect.ratio(), settings.initial_fill),
            aspect.ratio(),
            bounds,
            Pivot::TOP_LEFT,
        );
        let source_name = source_name.into();

        log::info!(
            "Opened crop session for {} ({}x{} shown at {}x{}, {})",
            source_name,
            geometry.natural_width,
            geometry.natural_height,
            geometry.display_width,
            geometry.display_height,
            aspect.label()
        );

        Self {
            geometry,
            bounds,
            aspect,
            min_dimension: settings.min_dimension,
            escape_margin: settings.escape_margin,
            handle_radius: settings.handle_radius,
            jpeg_quality: settings.jpeg_quality,
            source_name,
            rect,
            interaction: Interaction::Idle,
            capture,
        }
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    pub fn aspect(&self) -> AspectMode {
        self.aspect
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn handle_radius(&self) -> f64 {
        self.handle_radius
    }

    pub fn state(&self) -> InteractionState {
        match self.interaction {
            Interaction::Idle => InteractionState::Idle,
            Interaction::Dragging { .. } => InteractionState::Dragging,
            Interaction::Resizing { handle, .. } => InteractionState::Resizing(handle),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.interaction, Interaction::Idle)
    }

    /// What a pointer-down at `point` would grab.
    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        geometry::hit_test(&self.rect, point, self.handle_radius)
    }

    /// Natural-space region the current rectangle maps to.
    pub fn output_region(&self) -> Result<raster::SourceRegion, RasterError> {
        raster::source_region(&self.rect, &self.geometry)
    }

    /// Begin a move or resize if `point` hits the rectangle.
    pub fn pointer_down(&mut self, point: Point) -> PointerOutcome {
        if self.is_active() {
            return PointerOutcome::Ignored;
        }

        let Some(target) = self.hit_test(point) else {
            return PointerOutcome::Ignored;
        };

        let capture = self.capture.acquire();
        self.interaction = match target {
            HitTarget::Body => Interaction::Dragging {
                anchor: point,
                _capture: capture,
            },
            HitTarget::Handle(handle) => Interaction::Resizing {
                handle,
                anchor: point,
                _capture: capture,
            },
        };

        let state = self.state();
        log::debug!("Started {:?} at ({:.1}, {:.1})", state, point.x, point.y);
        PointerOutcome::Started(state)
    }

    /// Apply the movement since the last event to the active interaction.
    pub fn pointer_move(&mut self, point: Point) -> PointerOutcome {
        if !self.is_active() {
            return PointerOutcome::Ignored;
        }

        if self.escaped(point) {
            log::debug!(
                "Pointer escaped to ({:.1}, {:.1}), aborting {:?}",
                point.x,
                point.y,
                self.state()
            );
            self.interaction = Interaction::Idle;
            return PointerOutcome::Aborted;
        }

        let ratio = self.aspect.ratio();
        match &mut self.interaction {
            Interaction::Idle => PointerOutcome::Ignored,
            Interaction::Dragging { anchor, .. } => {
                let (dx, dy) = (point.x - anchor.x, point.y - anchor.y);
                *anchor = point;
                self.rect = geometry::translate(&self.rect, dx, dy, self.bounds);
                PointerOutcome::Moved
            }
            Interaction::Resizing { handle, anchor, .. } => {
                let (dx, dy) = (point.x - anchor.x, point.y - anchor.y);
                *anchor = point;
                let candidate = geometry::resize(&self.rect, *handle, dx, dy, ratio, self.min_dimension);
                self.rect = geometry::correct_bounds(candidate, ratio, self.bounds, Pivot::of(*handle));
                PointerOutcome::Resized(*handle)
            }
        }
    }

    /// End the active interaction, wherever the pointer is.
    pub fn pointer_up(&mut self) -> PointerOutcome {
        if !self.is_active() {
            return PointerOutcome::Ignored;
        }

        log::debug!("Finished {:?} with {:?}", self.state(), self.rect);
        self.interaction = Interaction::Idle;
        PointerOutcome::Ended
    }

    /// Freeze the rectangle and rasterize it from the natural-size `source`.
    pub fn confirm(&mut self, source: &DynamicImage) -> Result<CroppedImage, RasterError> {
        self.interaction = Interaction::Idle;

        let rect = self.rect;
        let file_name = raster::output_file_name(&self.source_name);
        match raster::rasterize(source, &rect, &self.geometry, self.jpeg_quality, file_name) {
            Ok(output) => {
                log::info!(
                    "Cropped {} to {}x{} ({} bytes)",
                    self.source_name,
                    output.width,
                    output.height,
                    output.bytes.len()
                );
                Ok(output)
            }
            Err(e) => {
                log::error!("Failed to crop {}: {}", self.source_name, e);
                Err(e)
            }
        }
    }

    /// Close the session without producing output.
    pub fn cancel(self) {
        log::info!("Cancelled crop session for {}", self.source_name);
    }

    fn escaped(&self, point: Point) -> bool {
        let margin = self.escape_margin;
        point.x < -margin
            || point.y < -margin
            || point.x > self.bounds.width + margin
            || point.y > self.bounds.height + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::cell::Cell;
    use std::rc::Rc;

    const EPS: f64 = 1e-3;

    /// Records how often capture was taken and given back.
    #[derive(Default, Clone)]
    struct CountingCapture {
        acquired: Rc<Cell<usize>>,
        released: Rc<Cell<usize>>,
    }

    struct CountingGuard(Rc<Cell<usize>>);

    impl Drop for CountingGuard {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    impl PointerCapture for CountingCapture {
        type Guard = CountingGuard;

        fn acquire(&mut self) -> CountingGuard {
            self.acquired.set(self.acquired.get() + 1);
            CountingGuard(self.released.clone())
        }
    }

    fn open_cover() -> (CropSession<CountingCapture>, CountingCapture) {
        let capture = CountingCapture::default();
        let session = CropSession::open(
            1920,
            1080,
            "hero.png",
            AspectMode::Cover,
            &CropSettings::default(),
            capture.clone(),
        );
        (session, capture)
    }

    fn assert_valid(session: &CropSession<CountingCapture>) {
        let rect = session.rect();
        let geometry = session.geometry();
        assert!((rect.aspect() - session.aspect().ratio()).abs() < EPS, "{rect:?}");
        assert!(rect.x >= 0.0 && rect.y >= 0.0, "{rect:?}");
        assert!(rect.right() <= geometry.display_width + 1e-9, "{rect:?}");
        assert!(rect.bottom() <= geometry.display_height + 1e-9, "{rect:?}");
        assert!(rect.width >= 20.0 - 1e-9, "{rect:?}");
    }

    #[test]
    fn test_open_centers_initial_rect() {
        let (session, _) = open_cover();
        let geometry = session.geometry();
        assert_eq!((geometry.display_width, geometry.display_height), (900.0, 506.0));

        let rect = session.rect();
        assert!((rect.width - 720.0).abs() < EPS);
        assert!((rect.height - 405.0).abs() < EPS);
        assert!((rect.x - 90.0).abs() < EPS);
        assert!((rect.y - 50.5).abs() < EPS);
        assert_eq!(session.state(), InteractionState::Idle);
    }

    #[test]
    fn test_drag_moves_incrementally() {
        let (mut session, capture) = open_cover();
        let start = session.rect();

        assert_eq!(
            session.pointer_down(Point::new(450.0, 250.0)),
            PointerOutcome::Started(InteractionState::Dragging)
        );
        assert_eq!(capture.acquired.get(), 1);

        assert_eq!(session.pointer_move(Point::new(440.0, 245.0)), PointerOutcome::Moved);
        assert_eq!(session.pointer_move(Point::new(440.0, 245.0)), PointerOutcome::Moved);
        let rect = session.rect();
        assert!((rect.x - (start.x - 10.0)).abs() < EPS);
        assert!((rect.y - (start.y - 5.0)).abs() < EPS);
        assert_eq!(rect.width.to_bits(), start.width.to_bits());
        assert_eq!(rect.height.to_bits(), start.height.to_bits());

        assert_eq!(session.pointer_up(), PointerOutcome::Ended);
        assert_eq!(capture.released.get(), 1);
        assert_eq!(session.state(), InteractionState::Idle);
    }

    #[test]
    fn test_pointer_down_outside_is_ignored() {
        let (mut session, capture) = open_cover();
        assert_eq!(session.pointer_down(Point::new(5.0, 5.0)), PointerOutcome::Ignored);
        assert_eq!(session.pointer_move(Point::new(50.0, 50.0)), PointerOutcome::Ignored);
        assert_eq!(session.pointer_up(), PointerOutcome::Ignored);
        assert_eq!(capture.acquired.get(), 0);
    }

    #[test]
    fn test_second_pointer_down_ignored_while_active() {
        let (mut session, capture) = open_cover();
        session.pointer_down(Point::new(450.0, 250.0));
        assert_eq!(session.pointer_down(Point::new(90.0, 50.5)), PointerOutcome::Ignored);
        assert_eq!(session.state(), InteractionState::Dragging);
        assert_eq!(capture.acquired.get(), 1);
    }

    #[test]
    fn test_handle_resize_keeps_ratio() {
        let (mut session, _) = open_cover();
        let se = Handle::SE.position(&session.rect());

        assert_eq!(
            session.pointer_down(se),
            PointerOutcome::Started(InteractionState::Resizing(Handle::SE))
        );
        assert_eq!(
            session.pointer_move(Point::new(se.x - 100.0, se.y - 10.0)),
            PointerOutcome::Resized(Handle::SE)
        );
        let rect = session.rect();
        assert!((rect.width - 620.0).abs() < EPS);
        assert_valid(&session);
    }

    #[test]
    fn test_escape_aborts_and_releases() {
        let (mut session, capture) = open_cover();
        session.pointer_down(Point::new(450.0, 250.0));
        session.pointer_move(Point::new(460.0, 250.0));
        let before = session.rect();

        assert_eq!(session.pointer_move(Point::new(-151.0, 250.0)), PointerOutcome::Aborted);
        assert_eq!(session.state(), InteractionState::Idle);
        assert_eq!(capture.released.get(), 1);
        assert_eq!(session.rect(), before);

        assert_eq!(session.pointer_move(Point::new(400.0, 250.0)), PointerOutcome::Ignored);
    }

    #[test]
    fn test_pointer_within_margin_keeps_interaction() {
        let (mut session, capture) = open_cover();
        session.pointer_down(Point::new(450.0, 250.0));
        assert_eq!(session.pointer_move(Point::new(1040.0, 640.0)), PointerOutcome::Moved);
        assert!(session.is_active());
        assert_eq!(capture.released.get(), 0);
        assert_valid(&session);
    }

    #[test]
    fn test_nw_resize_against_left_edge() {
        let (mut session, _) = open_cover();

        // Shrink to 320 wide, then park the rectangle near the left edge.
        session.pointer_down(Point::new(810.0, 455.5));
        session.pointer_move(Point::new(410.0, 455.5));
        session.pointer_up();
        session.pointer_down(Point::new(250.0, 140.5));
        session.pointer_move(Point::new(180.0, 390.0));
        session.pointer_up();
        let parked = session.rect();
        assert!((parked.x - 20.0).abs() < EPS);
        assert!((parked.y - 300.0).abs() < EPS);
        assert!((parked.width - 320.0).abs() < EPS);

        // Candidate x would be -30, candidate width 370.
        assert_eq!(
            session.pointer_down(Point::new(20.0, 300.0)),
            PointerOutcome::Started(InteractionState::Resizing(Handle::NW))
        );
        session.pointer_move(Point::new(-30.0, 300.0));
        let rect = session.rect();
        assert_eq!(rect.x, 0.0);
        assert!((rect.width - 340.0).abs() < EPS);
        assert!((rect.height - 340.0 * 9.0 / 16.0).abs() < EPS);
        assert!((rect.bottom() - parked.bottom()).abs() < EPS);
        assert_valid(&session);
    }

    #[test]
    fn test_scripted_interactions_hold_invariants() {
        let (mut session, capture) = open_cover();
        let mut seed = 42_u64;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 11) as f64 / (1u64 << 53) as f64
        };

        for _ in 0..300 {
            let rect = session.rect();
            let grab = if next() < 0.5 {
                Handle::ALL[(next() * 8.0) as usize % 8].position(&rect)
            } else {
                Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
            };
            session.pointer_down(grab);

            let mut pointer = grab;
            for _ in 0..10 {
                pointer.x += (next() * 2.0 - 1.0) * 80.0;
                pointer.y += (next() * 2.0 - 1.0) * 80.0;
                session.pointer_move(pointer);
                assert_valid(&session);
            }
            session.pointer_up();
            assert!(!session.is_active());
        }

        assert_eq!(capture.acquired.get(), capture.released.get());
    }

    #[test]
    fn test_confirm_produces_artifact_and_releases() {
        let capture = CountingCapture::default();
        let mut session = CropSession::open(
            1500,
            1000,
            "/photos/dish.png",
            AspectMode::Thumbnail,
            &CropSettings::default(),
            capture.clone(),
        );
        session.pointer_down(Point::new(450.0, 300.0));

        let source = DynamicImage::ImageRgb8(RgbImage::new(1500, 1000));
        let output = session.confirm(&source).unwrap();
        assert_eq!(capture.released.get(), 1);
        assert_eq!(output.file_name, "dish-cropped.jpg");
        assert_eq!(output.media_type, "image/jpeg");
        assert_eq!((output.width, output.height), (1200, 900));
        assert_eq!(session.output_region().unwrap().width, 1200);
    }

    #[test]
    fn test_confirm_failure_emits_nothing() {
        let (mut session, _) = open_cover();
        let wrong_source = DynamicImage::ImageRgb8(RgbImage::new(16, 16));
        assert!(matches!(
            session.confirm(&wrong_source),
            Err(RasterError::SurfaceUnavailable(_))
        ));
    }

    #[test]
    fn test_cancel_releases_capture() {
        let (mut session, capture) = open_cover();
        let se = Handle::SE.position(&session.rect());
        session.pointer_down(se);
        session.cancel();
        assert_eq!(capture.acquired.get(), 1);
        assert_eq!(capture.released.get(), 1);
    }
}
