// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hole sign state.
//!
//! The aggregate held by the store: hole number, the uploaded course image
//! reference and every marker placed on it.

use super::marker::{BasketMarker, MarkerId, TeeMarker};

/// Complete state of the tee sign being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct HoleSignState {
    pub hole_number: u32,
    /// Opaque reference to the course image (its source path).
    pub uploaded_image: Option<String>,
    pub tee_marker: Option<TeeMarker>,
    /// Insertion order is drawing order.
    pub basket_markers: Vec<BasketMarker>,
}

impl Default for HoleSignState {
    fn default() -> Self {
        Self {
            hole_number: 1,
            uploaded_image: None,
            tee_marker: None,
            basket_markers: Vec::new(),
        }
    }
}

impl HoleSignState {
    pub fn basket(&self, id: MarkerId) -> Option<&BasketMarker> {
        self.basket_markers.iter().find(|b| b.id == id)
    }

    pub fn has_markers(&self) -> bool {
        self.tee_marker.is_some() || !self.basket_markers.is_empty()
    }
}
