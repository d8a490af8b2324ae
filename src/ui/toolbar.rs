// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and placement controls.
//!
//! This module provides the toolbar for starting marker placements and for
//! the common sign operations (clear, export, preview).

use crate::models::{marker::BasketColor, sign::HoleSignState};
use crate::placement::{PlacementController, PlacementMode};

/// Action requested from the toolbar.
pub enum ToolbarAction {
    None,
    BeginTee,
    BeginBasket(BasketColor),
    CancelPlacement,
    ClearMarkers,
    ChangeImage,
    Export,
    TogglePreview,
}

/// Label for a basket placement button.
fn basket_button_label(color: BasketColor) -> String {
    format!("● Add {} Basket", color.style().name)
}

/// Display the toolbar. Buttons are disabled when their action is not
/// currently allowed.
pub fn show(
    ui: &mut egui::Ui,
    state: &HoleSignState,
    placement: &PlacementController,
    export_running: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let has_image = state.uploaded_image.is_some();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Markers:");
        ui.separator();

        let tee_enabled = has_image && placement.can_begin_tee(state);
        let tee_selected = placement.mode() == PlacementMode::PlacingTee;
        if ui
            .add_enabled(tee_enabled || tee_selected, egui::SelectableLabel::new(tee_selected, "▭ Add Tee Marker"))
            .clicked()
        {
            action = if tee_selected {
                ToolbarAction::CancelPlacement
            } else {
                ToolbarAction::BeginTee
            };
        }

        let basket_enabled = has_image && placement.can_begin_basket(state);
        for color in BasketColor::ALL {
            let selected = placement.mode() == PlacementMode::PlacingBasket(color);
            if ui
                .add_enabled(
                    basket_enabled || selected,
                    egui::SelectableLabel::new(selected, basket_button_label(color)),
                )
                .clicked()
            {
                action = if selected {
                    ToolbarAction::CancelPlacement
                } else {
                    ToolbarAction::BeginBasket(color)
                };
            }
        }

        if placement.is_placing() && ui.button("Cancel").clicked() {
            action = ToolbarAction::CancelPlacement;
        }

        ui.separator();

        if ui
            .add_enabled(state.has_markers(), egui::Button::new("Clear Markers"))
            .clicked()
        {
            action = ToolbarAction::ClearMarkers;
        }
        if ui.add_enabled(has_image, egui::Button::new("Change Image")).clicked() {
            action = ToolbarAction::ChangeImage;
        }

        ui.separator();

        if ui.add_enabled(has_image, egui::Button::new("Preview")).clicked() {
            action = ToolbarAction::TogglePreview;
        }
        let export_label = if export_running {
            "Exporting..."
        } else {
            "⬇ Export Tee Sign PNG"
        };
        if ui
            .add_enabled(has_image && !export_running, egui::Button::new(export_label))
            .clicked()
        {
            action = ToolbarAction::Export;
        }

        ui.separator();

        let hint = match placement.mode() {
            PlacementMode::Idle if !has_image => "Upload a course image to start",
            PlacementMode::Idle => "Add markers, then drag them to adjust",
            PlacementMode::PlacingTee => "Click on the map to place the tee",
            PlacementMode::PlacingBasket(_) => "Click on the map to place the basket",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basket_button_label() {
        assert_eq!(basket_button_label(BasketColor::White), "● Add White Basket");
    }
}
