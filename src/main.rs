// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tee Sign Maker
//!
//! A cross-platform desktop application for building disc golf tee signs:
//! place a tee pad and up to three baskets on a course image, fill in par
//! and distance, and export the finished sign as a PNG.

mod app;
mod config;
mod export;
mod io;
mod models;
mod placement;
mod render;
mod store;
mod ui;
mod util;
mod validation;

use anyhow::Result;
use app::TeeSignApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load()?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Tee Sign Maker"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Tee Sign Maker",
        options,
        Box::new(move |_cc| Ok(Box::new(TeeSignApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
