// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! screen/pixel coordinates and percentage positions on the course image.

use crate::models::marker::Position;
use egui::{Pos2, Rect};

/// Convert a pointer position to a percentage position on the image.
///
/// Returns `None` when the pointer falls outside `image_rect` or the rect
/// has no area. Clicks outside the image are discarded, not clamped.
pub fn pointer_to_position(pointer: Pos2, image_rect: Rect) -> Option<Position> {
    if image_rect.width() <= 0.0 || image_rect.height() <= 0.0 || !image_rect.contains(pointer) {
        return None;
    }
    Some(pointer_to_position_clamped(pointer, image_rect))
}

/// Convert a pointer position to a percentage position, clamping pointers
/// that left the image back onto its edge. Used while dragging.
pub fn pointer_to_position_clamped(pointer: Pos2, image_rect: Rect) -> Position {
    let width = image_rect.width().max(f32::EPSILON);
    let height = image_rect.height().max(f32::EPSILON);
    Position::clamped(
        (pointer.x - image_rect.min.x) * 100.0 / width,
        (pointer.y - image_rect.min.y) * 100.0 / height,
    )
}

/// Convert a percentage position to a point inside `image_rect`.
pub fn position_to_pixels(position: Position, image_rect: Rect) -> Pos2 {
    egui::pos2(
        image_rect.min.x + position.x * image_rect.width() / 100.0,
        image_rect.min.y + position.y * image_rect.height() / 100.0,
    )
}

/// Corners of a `width` x `height` rectangle centered on `center` and
/// rotated clockwise by `degrees`, in top-left, top-right, bottom-right,
/// bottom-left order.
pub fn rotated_rect_corners(center: Pos2, width: f32, height: f32, degrees: f32) -> [Pos2; 4] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let hw = width / 2.0;
    let hh = height / 2.0;
    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(dx, dy)| {
        egui::pos2(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_200x100() -> Rect {
        Rect::from_min_size(egui::pos2(40.0, 30.0), egui::vec2(200.0, 100.0))
    }

    #[test]
    fn test_center_click_is_fifty_percent() {
        let pos = pointer_to_position(egui::pos2(140.0, 80.0), rect_200x100()).unwrap();
        assert_eq!(pos, Position::new(50.0, 50.0));
    }

    #[test]
    fn test_whole_percent_click_is_exact() {
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(200.0, 100.0));
        let pos = pointer_to_position(egui::pos2(60.0, 70.0), rect).unwrap();
        assert_eq!(pos, Position::new(30.0, 70.0));

        let offset = pointer_to_position(egui::pos2(100.0, 100.0), rect_200x100()).unwrap();
        assert_eq!(offset, Position::new(30.0, 70.0));
    }

    #[test]
    fn test_top_left_corner_is_origin() {
        let pos = pointer_to_position(egui::pos2(40.0, 30.0), rect_200x100()).unwrap();
        assert_eq!(pos, Position::new(0.0, 0.0));
    }

    #[test]
    fn test_outside_click_is_discarded() {
        assert!(pointer_to_position(egui::pos2(39.0, 80.0), rect_200x100()).is_none());
        assert!(pointer_to_position(egui::pos2(140.0, 131.0), rect_200x100()).is_none());
    }

    #[test]
    fn test_degenerate_rect_is_discarded() {
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(0.0, 100.0));
        assert!(pointer_to_position(egui::pos2(0.0, 10.0), rect).is_none());
    }

    #[test]
    fn test_drag_clamps_to_image() {
        let pos = pointer_to_position_clamped(egui::pos2(-500.0, 1000.0), rect_200x100());
        assert_eq!(pos, Position::new(0.0, 100.0));
    }

    #[test]
    fn test_position_to_pixels_roundtrip() {
        let rect = rect_200x100();
        let pixel = position_to_pixels(Position::new(25.0, 75.0), rect);
        assert_eq!(pixel, egui::pos2(90.0, 105.0));
        let back = pointer_to_position(pixel, rect).unwrap();
        assert!((back.x - 25.0).abs() < 0.0001);
        assert!((back.y - 75.0).abs() < 0.0001);
    }

    #[test]
    fn test_unrotated_corners() {
        let corners = rotated_rect_corners(egui::pos2(0.0, 0.0), 60.0, 40.0, 0.0);
        assert_eq!(corners[0], egui::pos2(-30.0, -20.0));
        assert_eq!(corners[2], egui::pos2(30.0, 20.0));
    }

    #[test]
    fn test_quarter_turn_swaps_extent() {
        let corners = rotated_rect_corners(egui::pos2(0.0, 0.0), 60.0, 40.0, 90.0);
        let max_x = corners.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let max_y = corners.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert!((max_x - 20.0).abs() < 0.001);
        assert!((max_y - 30.0).abs() < 0.001);
    }
}
