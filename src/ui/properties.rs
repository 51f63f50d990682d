// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop properties panel.
//!
//! Shows the source and display sizes, the crop rectangle in display units
//! and the size of the image a confirm would produce.

use crate::session::capture::PointerCapture;
use crate::session::{CropSession, InteractionState};

/// Display the properties panel.
pub fn show<C: PointerCapture>(ui: &mut egui::Ui, session: Option<&CropSession<C>>) {
    ui.heading("Crop");
    ui.separator();

    let Some(session) = session else {
        ui.label(egui::RichText::new("No image loaded").weak());
        return;
    };

    let geometry = session.geometry();
    let rect = session.rect();

    egui::Grid::new("crop_properties")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label("Source");
            ui.label(session.source_name());
            ui.end_row();

            ui.label("Natural size");
            ui.label(format!("{} × {}", geometry.natural_width, geometry.natural_height));
            ui.end_row();

            ui.label("Display size");
            ui.label(format!("{:.0} × {:.0}", geometry.display_width, geometry.display_height));
            ui.end_row();

            let (scale_x, scale_y) = geometry.scale();
            ui.label("Scale");
            ui.label(format!("{:.3} × {:.3}", scale_x, scale_y));
            ui.end_row();

            ui.label("Aspect");
            ui.label(format!("{} ({:.3})", session.aspect().label(), rect.aspect()));
            ui.end_row();

            ui.label("Position");
            ui.label(format!("{:.1}, {:.1}", rect.x, rect.y));
            ui.end_row();

            ui.label("Frame");
            ui.label(format!("{:.1} × {:.1}", rect.width, rect.height));
            ui.end_row();

            ui.label("Output");
            match session.output_region() {
                Ok(region) => ui.label(format!("{} × {} px", region.width, region.height)),
                Err(e) => ui.colored_label(egui::Color32::LIGHT_RED, e.to_string()),
            };
            ui.end_row();

            ui.label("State");
            ui.label(match session.state() {
                InteractionState::Idle => "Idle".to_string(),
                InteractionState::Dragging => "Moving".to_string(),
                InteractionState::Resizing(handle) => format!("Resizing ({handle:?})"),
            });
            ui.end_row();
        });
}
