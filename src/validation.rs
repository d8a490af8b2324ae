// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Input validation for hole info and uploaded images.
//!
//! These predicates are consulted by the properties panel and the image
//! loader before anything reaches the store. The store itself does not
//! re-validate.

use crate::io::media::ImageFile;
use crate::models::marker::Par;

pub const MIN_HOLE_NUMBER: i64 = 1;
pub const MAX_HOLE_NUMBER: i64 = 36;
pub const MAX_DISTANCE: i64 = 2000;
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Check that a hole number is within 1..=36.
pub fn validate_hole_number(hole_number: i64) -> bool {
    (MIN_HOLE_NUMBER..=MAX_HOLE_NUMBER).contains(&hole_number)
}

/// Check that a par is 3, 4 or 5. Use `Par::try_from` to get the typed value.
pub fn validate_par(par: i64) -> bool {
    Par::try_from(par).is_ok()
}

/// Check that a distance in feet is positive and at most 2000.
pub fn validate_distance(distance: i64) -> bool {
    distance > 0 && distance <= MAX_DISTANCE
}

/// Check that an image file has an allowed MIME type and is at most 10 MiB.
pub fn validate_image_file(file: &ImageFile) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&file.mime_type.as_str()) && file.size <= MAX_IMAGE_BYTES
}

/// Reduce free text to a single uppercase label character.
pub fn normalize_label(input: &str) -> Option<char> {
    input
        .trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
}
