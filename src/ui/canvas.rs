// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop canvas.
//!
//! This module draws the display copy of the source image with the crop
//! rectangle on top and reports pointer activity in display-space
//! coordinates. Presses are hit-tested on the image only; once an
//! interaction runs, movement and release are read from the global pointer
//! state so fast drags that leave the image keep working.

use crate::models::crop::{CropRect, Handle, Point};
use crate::session::capture::PointerCapture;
use crate::session::CropSession;
use crate::util::geometry::HitTarget;

/// Pointer activity on the canvas, in the order it happened this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
}

/// Id of the canvas' drag-sensing area.
pub fn canvas_id() -> egui::Id {
    egui::Id::new("crop_canvas")
}

/// Keeps egui routing the drag to the canvas while an interaction runs.
pub struct DragCapture {
    ctx: egui::Context,
}

impl DragCapture {
    pub fn new(ctx: &egui::Context) -> Self {
        Self { ctx: ctx.clone() }
    }
}

/// Gives the drag back to egui when dropped.
pub struct DragGuard {
    ctx: egui::Context,
}

impl PointerCapture for DragCapture {
    type Guard = DragGuard;

    fn acquire(&mut self) -> DragGuard {
        self.ctx.set_dragged_id(canvas_id());
        DragGuard {
            ctx: self.ctx.clone(),
        }
    }
}

impl Drop for DragGuard {
    fn drop(&mut self) {
        if self.ctx.is_being_dragged(canvas_id()) {
            self.ctx.stop_dragging();
        }
        self.ctx.request_repaint();
    }
}

fn to_screen(origin: egui::Pos2, point: Point) -> egui::Pos2 {
    origin + egui::vec2(point.x as f32, point.y as f32)
}

fn to_display(origin: egui::Pos2, pos: egui::Pos2) -> Point {
    Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}

fn screen_rect(origin: egui::Pos2, rect: &CropRect) -> egui::Rect {
    egui::Rect::from_min_size(
        to_screen(origin, Point::new(rect.x, rect.y)),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

fn cursor_for(target: HitTarget) -> egui::CursorIcon {
    match target {
        HitTarget::Body => egui::CursorIcon::Move,
        HitTarget::Handle(Handle::N) | HitTarget::Handle(Handle::S) => egui::CursorIcon::ResizeVertical,
        HitTarget::Handle(Handle::E) | HitTarget::Handle(Handle::W) => egui::CursorIcon::ResizeHorizontal,
        HitTarget::Handle(Handle::NW) | HitTarget::Handle(Handle::SE) => egui::CursorIcon::ResizeNwSe,
        HitTarget::Handle(Handle::NE) | HitTarget::Handle(Handle::SW) => egui::CursorIcon::ResizeNeSw,
    }
}

/// Display the crop canvas and collect pointer activity.
pub fn show<C: PointerCapture>(
    ui: &mut egui::Ui,
    session: Option<&CropSession<C>>,
    preview: &Option<egui::TextureHandle>,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(session), Some(texture)) = (session, preview) else {
            show_welcome(ui);
            return;
        };

        let geometry = session.geometry();
        let display_size = egui::vec2(geometry.display_width as f32, geometry.display_height as f32);

        // Center the image
        let available = ui.available_size();
        let offset = ((available - display_size) / 2.0).max(egui::Vec2::ZERO);
        let image_rect = egui::Rect::from_min_size(ui.min_rect().min + offset, display_size);
        let origin = image_rect.min;

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let response = ui.interact(image_rect, canvas_id(), egui::Sense::drag());

        if session.is_active() {
            // Continuation is global: read the pointer wherever it is.
            let (latest, released) = ui
                .ctx()
                .input(|i| (i.pointer.latest_pos(), i.pointer.any_released()));
            if let Some(pos) = latest {
                actions.push(CanvasAction::PointerMove(to_display(origin, pos)));
            }
            if released {
                actions.push(CanvasAction::PointerUp);
            }
            ui.ctx().request_repaint();
        } else if response.drag_started() {
            let press = ui
                .ctx()
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(pos) = press {
                actions.push(CanvasAction::PointerDown(to_display(origin, pos)));
                if let Some(current) = response.interact_pointer_pos() {
                    actions.push(CanvasAction::PointerMove(to_display(origin, current)));
                }
            }
        } else if let Some(hover) = response.hover_pos() {
            if let Some(target) = session.hit_test(to_display(origin, hover)) {
                ui.ctx().set_cursor_icon(cursor_for(target));
            }
        }

        draw_crop(ui.painter(), image_rect, &session.rect(), session.handle_radius() as f32);
    });

    actions
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("ratiocrop")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Aspect-ratio locked image cropping")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image to begin cropping")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Image...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

/// Dim everything outside the crop, then draw the border, thirds and handles.
fn draw_crop(painter: &egui::Painter, image_rect: egui::Rect, rect: &CropRect, handle_radius: f32) {
    let origin = image_rect.min;
    let crop = screen_rect(origin, rect);
    let overlay = egui::Color32::from_black_alpha(150);

    let shades = [
        egui::Rect::from_min_max(image_rect.min, egui::pos2(image_rect.max.x, crop.min.y)),
        egui::Rect::from_min_max(egui::pos2(image_rect.min.x, crop.max.y), image_rect.max),
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, crop.min.y),
            egui::pos2(crop.min.x, crop.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(crop.max.x, crop.min.y),
            egui::pos2(image_rect.max.x, crop.max.y),
        ),
    ];
    for shade in shades {
        if shade.is_positive() {
            painter.rect_filled(shade, 0.0, overlay);
        }
    }

    let guide = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(90));
    for i in 1..3 {
        let t = i as f32 / 3.0;
        let x = crop.min.x + crop.width() * t;
        let y = crop.min.y + crop.height() * t;
        painter.line_segment([egui::pos2(x, crop.min.y), egui::pos2(x, crop.max.y)], guide);
        painter.line_segment([egui::pos2(crop.min.x, y), egui::pos2(crop.max.x, y)], guide);
    }

    painter.rect_stroke(crop, 0.0, egui::Stroke::new(2.0, egui::Color32::WHITE));

    let handle_size = (handle_radius * 0.6).max(4.0);
    for handle in Handle::ALL {
        let center = to_screen(origin, handle.position(rect));
        painter.circle(
            center,
            handle_size,
            egui::Color32::WHITE,
            egui::Stroke::new(1.0, egui::Color32::BLACK),
        );
    }
}
