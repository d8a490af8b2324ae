// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tee sign export pipeline.
//!
//! Rasterizes a `PreviewSurface`, encodes it as PNG and hands the bytes to a
//! `FileSaver`. Every failure is reported as an `ExportError` whose message
//! starts with `Failed to export tee sign: `.

use crate::config::ExportOptions;
use crate::render::PreviewSurface;
use crate::util::color::parse_css_color;
use anyhow::{anyhow, Context, Result};
use image::{ImageFormat, RgbaImage};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Turns a surface into pixels.
pub trait Rasterizer {
    /// Render `surface` at `scale` over `background`. `Ok(None)` means the
    /// rasterizer ran but produced no image.
    fn rasterize(&self, surface: &PreviewSurface, scale: f32, background: [u8; 4]) -> Result<Option<RgbaImage>>;
}

/// Stores encoded PNG bytes under a file name.
pub trait FileSaver {
    fn save(&self, png: &[u8], file_name: &str) -> Result<PathBuf>;
}

/// Failure of a single export. The store is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to export tee sign: {cause}")]
pub struct ExportError {
    cause: String,
}

impl ExportError {
    pub fn new(cause: impl Into<String>) -> Self {
        let cause = cause.into();
        let cause = if cause.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            cause
        };
        Self { cause }
    }
}

impl From<anyhow::Error> for ExportError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{:#}", err))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        UNKNOWN_ERROR.to_string()
    }
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .context("cannot encode PNG")?;
    Ok(buffer.into_inner())
}

/// Rasterize the surface and save it as a PNG. Returns the saved path.
pub fn export_tee_sign(
    surface: &PreviewSurface,
    options: &ExportOptions,
    rasterizer: &dyn Rasterizer,
    saver: &dyn FileSaver,
) -> Result<PathBuf, ExportError> {
    if !(options.scale.is_finite() && options.scale > 0.0) {
        return Err(ExportError::new(format!("scale must be positive, got {}", options.scale)));
    }
    let background = parse_css_color(&options.background_color)?;

    let rendered = catch_unwind(AssertUnwindSafe(|| {
        rasterizer.rasterize(surface, options.scale, background)
    }))
    .map_err(|payload| ExportError::new(panic_message(payload.as_ref())))??;
    let image = rendered.ok_or_else(|| anyhow!("rasterizer produced no image"))?;

    let png = encode_png(&image)?;
    let path = saver.save(&png, &options.file_name)?;
    log::info!(
        "Exported tee sign {}x{} ({} bytes) to {}",
        image.width(),
        image.height(),
        png.len(),
        path.display()
    );
    Ok(path)
}

/// Run `export_tee_sign` on a background thread. The receiver yields the
/// result once. Callers must not start a second export while one runs.
pub fn spawn_export(
    surface: PreviewSurface,
    options: ExportOptions,
    rasterizer: Arc<dyn Rasterizer + Send + Sync>,
    saver: Box<dyn FileSaver + Send>,
) -> Receiver<Result<PathBuf, ExportError>> {
    let (sender, receiver) = channel();
    std::thread::spawn(move || {
        let result = export_tee_sign(&surface, &options, rasterizer.as_ref(), saver.as_ref());
        if let Err(ref e) = result {
            log::error!("{}", e);
        }
        let _ = sender.send(result);
    });
    receiver
}

/// Removes a partially written file unless it was committed.
struct PartialFile {
    path: PathBuf,
    committed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, committed: false }
    }

    fn commit(mut self, target: &Path) -> Result<()> {
        std::fs::rename(&self.path, target)
            .with_context(|| format!("cannot move {} to {}", self.path.display(), target.display()))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.committed && self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!("Cannot remove partial export {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Saves exports into a directory.
pub struct DiskSaver {
    directory: PathBuf,
}

impl DiskSaver {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl FileSaver for DiskSaver {
    fn save(&self, png: &[u8], file_name: &str) -> Result<PathBuf> {
        let target = self.directory.join(file_name);
        let partial = PartialFile::new(self.directory.join(format!("{}.part", file_name)));
        std::fs::write(&partial.path, png)
            .with_context(|| format!("cannot write {}", partial.path.display()))?;
        partial.commit(&target)?;
        Ok(target)
    }
}
