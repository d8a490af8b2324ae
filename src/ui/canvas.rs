// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive course map canvas.
//!
//! This module provides the main canvas area where the course image is
//! displayed with its markers. While a placement is active a click anywhere
//! on the canvas is reported for placement; otherwise markers can be dragged
//! to new positions.

use crate::models::{
    marker::{MarkerId, Position},
    sign::HoleSignState,
};
use crate::placement::PlacementMode;
use crate::util::geometry::{pointer_to_position_clamped, position_to_pixels, rotated_rect_corners};

const BASKET_RADIUS: f32 = 16.0;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// A click while placing, with the rectangle the image occupies.
    Click(egui::Pos2, egui::Rect),
    MoveTee(Position),
    MoveBasket(MarkerId, Position),
    OpenImage,
}

fn color32(rgba: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Display the main canvas area and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    state: &HoleSignState,
    mode: PlacementMode,
    image_texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some((img_width, img_height)), Some(_)) =
            (image_texture, image_size, state.uploaded_image.as_ref())
        else {
            if show_upload_screen(ui) {
                action = CanvasAction::OpenImage;
            }
            return;
        };

        // Fit the image into the available space
        let available = ui.available_size();
        let img_aspect = img_width as f32 / img_height as f32;
        let available_aspect = available.x / available.y;

        let (display_width, display_height) = if img_aspect > available_aspect {
            let width = available.x;
            (width, width / img_aspect)
        } else {
            let height = available.y;
            (height * img_aspect, height)
        };

        let x_offset = (available.x - display_width) / 2.0;
        let y_offset = (available.y - display_height) / 2.0;
        let canvas_rect = egui::Rect::from_min_size(ui.min_rect().min, available);
        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if mode != PlacementMode::Idle {
            // The whole canvas senses clicks so clicks beside the image
            // reach the placement controller and cancel the placement.
            let response = ui
                .allocate_rect(canvas_rect, egui::Sense::click())
                .on_hover_cursor(egui::CursorIcon::Crosshair);
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    action = CanvasAction::Click(pos, image_rect);
                }
            }
        } else if let Some(drag) = drag_markers(ui, state, image_rect) {
            action = drag;
        }

        let painter = ui.painter();
        if let Some(tee) = &state.tee_marker {
            let center = position_to_pixels(tee.position, image_rect);
            let corners = rotated_rect_corners(center, tee.width as f32, tee.height as f32, tee.rotation as f32);
            painter.add(egui::Shape::convex_polygon(
                corners.to_vec(),
                egui::Color32::from_rgb(0x22, 0xc5, 0x5e),
                egui::Stroke::new(3.0, egui::Color32::WHITE),
            ));
            painter.text(
                center + egui::vec2(0.0, tee.height as f32 / 2.0 + 12.0),
                egui::Align2::CENTER_CENTER,
                "Tee",
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );
        }

        for basket in &state.basket_markers {
            let style = basket.color.style();
            let center = position_to_pixels(basket.position, image_rect);
            painter.circle(
                center,
                BASKET_RADIUS,
                color32(style.fill),
                egui::Stroke::new(3.0, color32(style.border)),
            );
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                basket.label.to_string(),
                egui::FontId::proportional(14.0),
                color32(style.text),
            );
        }

        if let Some(hint) = placement_hint(mode) {
            let hint_rect = egui::Rect::from_min_size(canvas_rect.min + egui::vec2(12.0, 12.0), egui::vec2(320.0, 28.0));
            painter.rect_filled(hint_rect, 6.0, egui::Color32::from_rgba_unmultiplied(37, 99, 235, 230));
            painter.text(
                hint_rect.left_center() + egui::vec2(10.0, 0.0),
                egui::Align2::LEFT_CENTER,
                hint,
                egui::FontId::proportional(13.0),
                egui::Color32::WHITE,
            );
        }
    });

    action
}

/// Hint shown while a placement is active.
fn placement_hint(mode: PlacementMode) -> Option<String> {
    match mode {
        PlacementMode::Idle => None,
        PlacementMode::PlacingTee => Some("Click on the map to place the tee marker".to_string()),
        PlacementMode::PlacingBasket(color) => Some(format!(
            "Click on the map to place the {} basket",
            color.style().name.to_lowercase()
        )),
    }
}

/// Sense drags on each marker and report the new position of the one being
/// dragged. Positions are clamped to the image.
fn drag_markers(ui: &mut egui::Ui, state: &HoleSignState, image_rect: egui::Rect) -> Option<CanvasAction> {
    let mut action = None;

    if let Some(tee) = &state.tee_marker {
        let center = position_to_pixels(tee.position, image_rect);
        let size = egui::vec2(tee.width.max(tee.height) as f32, tee.width.max(tee.height) as f32);
        let response = ui.interact(
            egui::Rect::from_center_size(center, size),
            ui.id().with(("tee", tee.id)),
            egui::Sense::drag(),
        );
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                action = Some(CanvasAction::MoveTee(pointer_to_position_clamped(pos, image_rect)));
            }
        }
    }

    for basket in &state.basket_markers {
        let center = position_to_pixels(basket.position, image_rect);
        let response = ui.interact(
            egui::Rect::from_center_size(center, egui::vec2(BASKET_RADIUS * 2.0, BASKET_RADIUS * 2.0)),
            ui.id().with(("basket", basket.id)),
            egui::Sense::drag(),
        );
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                action = Some(CanvasAction::MoveBasket(
                    basket.id,
                    pointer_to_position_clamped(pos, image_rect),
                ));
            }
        }
    }

    action
}

/// Upload screen shown when no course image is loaded. Returns true when
/// the user asked to open an image.
fn show_upload_screen(ui: &mut egui::Ui) -> bool {
    let mut open = false;
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Tee Sign Maker")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Disc golf tee sign generator")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Upload a course image (PNG, JPG or WebP, up to 10 MB) to begin")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            if ui.button("Upload Course Image...").clicked() {
                open = true;
            }
        });
    });
    open
}
