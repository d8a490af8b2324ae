// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Course image loading.
//!
//! This module inspects and validates image files chosen by the user and
//! decodes them into RGBA pixels suitable for display in egui and for
//! rasterizing the exported sign.

use crate::validation::{validate_image_file, ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES};
use anyhow::{bail, Context, Result};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};

/// File-level facts about a candidate image, gathered before decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub mime_type: String,
    pub size: u64,
}

impl ImageFile {
    /// Read the MIME type (from the extension) and byte size of a file.
    pub fn inspect(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("cannot read metadata for {}", path.display()))?;
        let mime_type = ImageFormat::from_path(path)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());

        Ok(Self {
            path: path.to_path_buf(),
            mime_type,
            size: metadata.len(),
        })
    }
}

/// A validated, decoded course image.
pub struct CourseImage {
    /// Reference stored in the sign state.
    pub reference: String,
    pub pixels: RgbaImage,
}

/// Decode an image file into RGBA pixels.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| format!("cannot decode {}", path.display()))?;
    Ok(image.to_rgba8())
}

/// Inspect, validate and decode a course image.
pub fn ingest(path: &Path) -> Result<CourseImage> {
    let file = ImageFile::inspect(path)?;
    if !validate_image_file(&file) {
        bail!(
            "{} is not an accepted image ({}, {} bytes); expected one of {} up to {} MB",
            path.display(),
            file.mime_type,
            file.size,
            ALLOWED_IMAGE_TYPES.join(", "),
            MAX_IMAGE_BYTES / (1024 * 1024)
        );
    }

    let pixels = load_image(path)?;
    log::debug!(
        "Decoded {} as {} ({}x{})",
        path.display(),
        file.mime_type,
        pixels.width(),
        pixels.height()
    );

    Ok(CourseImage {
        reference: path.to_string_lossy().to_string(),
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_inspect_reports_mime_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("course.png");
        RgbaImage::from_pixel(4, 3, Rgba([10, 200, 30, 255]))
            .save(&path)
            .unwrap();

        let file = ImageFile::inspect(&path).unwrap();
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.size, std::fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn test_ingest_decodes_valid_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hole.png");
        RgbaImage::from_pixel(8, 5, Rgba([1, 2, 3, 255])).save(&path).unwrap();

        let course = ingest(&path).unwrap();
        assert_eq!(course.pixels.dimensions(), (8, 5));
        assert!(course.reference.ends_with("hole.png"));
    }

    #[test]
    fn test_ingest_rejects_unlisted_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hole.bmp");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])).save(&path).unwrap();

        let err = ingest(&path).err().unwrap();
        assert!(err.to_string().contains("not an accepted image"));
    }

    #[test]
    fn test_inspect_missing_file_fails() {
        assert!(ImageFile::inspect(Path::new("/definitely/not/here.png")).is_err());
    }
}
