// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ratiocrop - aspect-ratio locked image cropping
//!
//! A desktop tool for cropping images to a fixed aspect ratio: drag or
//! resize the frame over a downscaled copy, then export the selected region
//! of the full-resolution source as JPEG.
//!
//! Usage: `ratiocrop [IMAGE]`. Settings are read from the file named by
//! `RATIOCROP_CONFIG`, else `ratiocrop.yaml` in the working directory.

mod app;
mod io;
mod models;
mod session;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::CropApp;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = std::env::var_os(io::serialization::CONFIG_ENV).map(PathBuf::from);
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let settings = io::serialization::resolve_settings(config.as_deref(), &cwd)?;

    let startup_image = std::env::args_os().nth(1).map(PathBuf::from);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("ratiocrop"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "ratiocrop",
        options,
        Box::new(move |_cc| Ok(Box::new(CropApp::new(settings, startup_image)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
