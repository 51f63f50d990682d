// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module hosts one crop session at a time: it loads the source image
//! in the background, owns the preview texture, feeds canvas pointer
//! activity into the session and writes confirmed crops to disk.

use crate::io::media::{self, IMAGE_EXTENSIONS};
use crate::io::serialization;
use crate::io::raster::CroppedImage;
use crate::models::crop::AspectMode;
use crate::models::display::DisplayGeometry;
use crate::models::settings::CropSettings;
use crate::session::CropSession;
use crate::ui::canvas::{self, CanvasAction, DragCapture};
use crate::ui::{properties, toolbar};
use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Result of background image loading operation.
struct LoadedSource {
    path: PathBuf,
    image: DynamicImage,
    preview: media::Preview,
}

/// The source image of the open session.
struct Source {
    path: PathBuf,
    image: DynamicImage,
}

/// Main application state.
pub struct CropApp {
    settings: CropSettings,

    /// Aspect mode the next session opens with
    aspect: AspectMode,

    /// Full-resolution source being cropped
    source: Option<Source>,

    /// Display-size preview texture, released when the session closes
    preview: Option<egui::TextureHandle>,

    /// The open crop session
    session: Option<CropSession<DragCapture>>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedSource, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last outcome shown in the status bar
    status: Option<String>,

    /// Image passed on the command line, loaded on the first frame
    startup_image: Option<PathBuf>,
}

impl CropApp {
    /// Create a new application instance.
    pub fn new(settings: CropSettings, startup_image: Option<PathBuf>) -> Self {
        Self {
            settings,
            aspect: AspectMode::default(),
            source: None,
            preview: None,
            session: None,
            image_loader: None,
            loading_message: None,
            status: None,
            startup_image,
        }
    }

    /// Load an image file in the background.
    pub fn load_image_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        let settings = self.settings.clone();

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = (|| -> Result<LoadedSource, String> {
                let image = media::load_image(&path).map_err(|e| format!("{:#}", e))?;

                log::info!("Loaded image: {} ({}x{})", path.display(), image.width(), image.height());

                let geometry = DisplayGeometry::fit(
                    image.width(),
                    image.height(),
                    settings.bounding_box,
                    settings.display_headroom,
                );
                let preview = media::build_preview(&image, &geometry);

                Ok(LoadedSource {
                    path,
                    image,
                    preview,
                })
            })();

            let _ = sender.send(result);
        });
    }

    /// Start a session on the current source with the current aspect mode.
    fn open_session(&mut self, ctx: &egui::Context) {
        if let Some(ref source) = self.source {
            self.session = Some(CropSession::open(
                source.image.width(),
                source.image.height(),
                source.path.to_string_lossy(),
                self.aspect,
                &self.settings,
                DragCapture::new(ctx),
            ));
        }
    }

    /// Drop the session together with the source and its preview texture.
    fn close_session(&mut self) {
        self.session = None;
        self.source = None;
        if self.preview.take().is_some() {
            log::debug!("Released preview texture");
        }
    }

    fn set_aspect(&mut self, aspect: AspectMode, ctx: &egui::Context) {
        self.aspect = aspect;
        // The ratio is fixed per session, so a new mode means a new session.
        if self.session.take().is_some() {
            self.open_session(ctx);
        }
    }

    fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel();
            self.status = Some("Crop cancelled".to_string());
        }
        self.close_session();
    }

    fn confirm(&mut self) {
        let (Some(session), Some(source)) = (self.session.as_mut(), self.source.as_ref()) else {
            return;
        };

        match session.confirm(&source.image) {
            Ok(output) => match self.save_output(&output) {
                Ok(Some(path)) => {
                    self.status = Some(format!("Saved {}", path.display()));
                    self.close_session();
                }
                Ok(None) => {
                    self.status = Some("Save cancelled".to_string());
                }
                Err(e) => {
                    log::error!("Failed to save crop: {:#}", e);
                    self.status = Some(format!("Failed to save crop: {}", e));
                }
            },
            Err(e) => {
                self.status = Some(format!("Crop failed: {}", e));
            }
        }
    }

    /// Ask where to save `output` and write it. `None` if the user backed out.
    fn save_output(&self, output: &CroppedImage) -> Result<Option<PathBuf>> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JPEG", &["jpg", "jpeg"])
            .set_file_name(&output.file_name)
            .save_file()
        else {
            return Ok(None);
        };

        write_output(output, &path)?;
        Ok(Some(path))
    }

    fn apply_canvas_action(&mut self, action: CanvasAction) {
        let Some(ref mut session) = self.session else {
            return;
        };

        let outcome = match action {
            CanvasAction::PointerDown(point) => session.pointer_down(point),
            CanvasAction::PointerMove(point) => session.pointer_move(point),
            CanvasAction::PointerUp => session.pointer_up(),
        };
        log::trace!("{:?} -> {:?}", action, outcome);
    }

    fn poll_loader(&mut self, ctx: &egui::Context) {
        let Some(ref receiver) = self.image_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };

        self.image_loader = None;
        self.loading_message = None;

        match result {
            Ok(loaded) => {
                self.close_session();

                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied(loaded.preview.size, &loaded.preview.pixels);
                self.preview = Some(ctx.load_texture("crop_preview", color_image, egui::TextureOptions::LINEAR));
                self.source = Some(Source {
                    path: loaded.path,
                    image: loaded.image,
                });
                self.open_session(ctx);
                self.status = None;
            }
            Err(e) => {
                log::error!("Failed to load image: {}", e);
                self.status = Some(e);
            }
        }
    }

    fn save_settings(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("YAML", &["yaml", "yml"])
            .add_filter("JSON", &["json"])
            .set_file_name(serialization::DEFAULT_CONFIG_FILE)
            .save_file()
        else {
            return;
        };

        match serialization::save_settings(&self.settings, &path) {
            Ok(()) => self.status = Some(format!("Saved settings to {}", path.display())),
            Err(e) => {
                log::error!("{:#}", e);
                self.status = Some(format!("{:#}", e));
            }
        }
    }

    fn show_menu(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        // Open native file picker
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", IMAGE_EXTENSIONS)
                            .pick_file()
                        {
                            self.load_image_file(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Save Settings...").clicked() {
                        self.save_settings();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });
    }
}

/// Write an encoded crop to `path`.
fn write_output(output: &CroppedImage, path: &Path) -> Result<()> {
    std::fs::write(path, &output.bytes)
        .with_context(|| format!("Failed to write {} to {}", output.media_type, path.display()))?;
    log::info!("Wrote {} ({} bytes)", path.display(), output.bytes.len());
    Ok(())
}

impl eframe::App for CropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(path) = self.startup_image.take() {
            self.load_image_file(path);
        }

        // Check for completed image loading
        self.poll_loader(ctx);

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        self.show_menu(ctx);

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, self.aspect, self.session.is_some()))
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::SetAspect(aspect) => self.set_aspect(aspect, ctx),
            toolbar::ToolbarAction::Confirm => self.confirm(),
            toolbar::ToolbarAction::Cancel => self.cancel(),
            toolbar::ToolbarAction::None => {}
        }

        // Handle keyboard events
        if self.session.is_some() && !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.confirm();
            } else if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.cancel();
            }
        }

        // Properties panel (right side)
        egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, self.session.as_ref()));

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Aspect: {}", self.aspect.label()));
                ui.separator();
                match self.status {
                    Some(ref status) => ui.label(status),
                    None if self.session.is_some() => ui.label("Ready"),
                    None => ui.label("No image loaded"),
                };
            });
        });

        // Main canvas (center)
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                // Show loading overlay if loading
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    Vec::new()
                } else {
                    canvas::show(ui, self.session.as_ref(), &self.preview)
                }
            })
            .inner;

        for action in canvas_actions {
            self.apply_canvas_action(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::raster::JPEG_MEDIA_TYPE;

    #[test]
    fn test_write_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dish-cropped.jpg");
        let output = CroppedImage {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
            media_type: JPEG_MEDIA_TYPE,
            file_name: "dish-cropped.jpg".to_string(),
            width: 1,
            height: 1,
        };

        write_output(&output, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), output.bytes);
    }

    #[test]
    fn test_write_output_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = CroppedImage {
            bytes: vec![1],
            media_type: JPEG_MEDIA_TYPE,
            file_name: "x.jpg".to_string(),
            width: 1,
            height: 1,
        };
        assert!(write_output(&output, &dir.path().join("nope").join("x.jpg")).is_err());
    }
}
