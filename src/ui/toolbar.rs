// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with aspect mode selection and the confirm/cancel buttons.

use crate::models::crop::AspectMode;

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    SetAspect(AspectMode),
    Confirm,
    Cancel,
}

/// Display the toolbar. Confirm and cancel are only enabled while a
/// session is open.
pub fn show(ui: &mut egui::Ui, current_aspect: AspectMode, session_open: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Aspect:");

        ui.separator();

        for mode in AspectMode::ALL {
            if ui.selectable_label(current_aspect == mode, mode.label()).clicked() && mode != current_aspect {
                action = ToolbarAction::SetAspect(mode);
            }
        }

        ui.separator();

        if ui.add_enabled(session_open, egui::Button::new("✔ Crop (Enter)")).clicked() {
            action = ToolbarAction::Confirm;
        }
        if ui.add_enabled(session_open, egui::Button::new("✖ Cancel (Esc)")).clicked() {
            action = ToolbarAction::Cancel;
        }

        ui.separator();

        let hint = if session_open {
            "Drag the frame to move it, drag a handle to resize"
        } else {
            "Open an image to start cropping"
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
