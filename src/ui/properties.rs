// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hole information panel.
//!
//! This module provides the side panel for editing the hole number, the
//! tee marker's rotation and size, and each basket's label, par and
//! distance. Edits are validated here; invalid values never reach the
//! store.

use crate::models::{
    marker::{BasketMarkerUpdate, MarkerId, Par, TeeMarkerUpdate},
    sign::HoleSignState,
};
use crate::validation::{normalize_label, validate_distance, validate_hole_number, validate_par, MAX_HOLE_NUMBER};

/// Edit requested from the panel.
pub enum PropertiesAction {
    None,
    SetHoleNumber(u32),
    UpdateTee(TeeMarkerUpdate),
    UpdateBasket(MarkerId, BasketMarkerUpdate),
    RemoveBasket(MarkerId),
}

/// Display the panel and return the edit made this frame, if any.
pub fn show(ui: &mut egui::Ui, state: &HoleSignState) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Hole Information");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Hole Number");
        let mut hole = i64::from(state.hole_number);
        if ui.add(egui::DragValue::new(&mut hole).speed(0.1)).changed() {
            if validate_hole_number(hole) {
                action = PropertiesAction::SetHoleNumber(hole as u32);
            } else {
                log::debug!("Rejected hole number {} (1-{})", hole, MAX_HOLE_NUMBER);
            }
        }
    });

    ui.separator();

    if let Some(tee) = &state.tee_marker {
        ui.label(egui::RichText::new("Tee Pad").strong());
        let mut rotation = tee.rotation;
        if ui
            .add(egui::Slider::new(&mut rotation, 0..=360).text("Rotation (°)"))
            .changed()
        {
            action = PropertiesAction::UpdateTee(TeeMarkerUpdate {
                rotation: Some(rotation),
                ..Default::default()
            });
        }
        let mut width = tee.width;
        if ui.add(egui::Slider::new(&mut width, 20..=200).text("Width (px)")).changed() {
            action = PropertiesAction::UpdateTee(TeeMarkerUpdate {
                width: Some(width),
                ..Default::default()
            });
        }
        let mut height = tee.height;
        if ui.add(egui::Slider::new(&mut height, 20..=200).text("Height (px)")).changed() {
            action = PropertiesAction::UpdateTee(TeeMarkerUpdate {
                height: Some(height),
                ..Default::default()
            });
        }
        ui.separator();
    }

    if state.basket_markers.is_empty() {
        ui.label(
            egui::RichText::new("Add basket markers on the map to set par and distance")
                .italics()
                .weak(),
        );
        return action;
    }

    ui.label(egui::RichText::new("Basket Details").strong());
    egui::ScrollArea::vertical().show(ui, |ui| {
        for basket in &state.basket_markers {
            let style = basket.color.style();
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(style.legend).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("🗑").on_hover_text("Remove basket").clicked() {
                            action = PropertiesAction::RemoveBasket(basket.id);
                        }
                    });
                });

                ui.horizontal(|ui| {
                    ui.label("Label");
                    let mut label = basket.label.to_string();
                    let edit = ui.add(egui::TextEdit::singleline(&mut label).desired_width(24.0));
                    if edit.changed() {
                        if let Some(label) = edited_label(basket.label, &label) {
                            action = PropertiesAction::UpdateBasket(
                                basket.id,
                                BasketMarkerUpdate {
                                    label: Some(label),
                                    ..Default::default()
                                },
                            );
                        }
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Par");
                    let mut value = i64::from(basket.par.value());
                    if ui.add(egui::DragValue::new(&mut value).speed(0.05)).changed() {
                        match Par::try_from(value) {
                            Ok(par) if validate_par(value) => {
                                action = PropertiesAction::UpdateBasket(
                                    basket.id,
                                    BasketMarkerUpdate {
                                        par: Some(par),
                                        ..Default::default()
                                    },
                                );
                            }
                            _ => log::debug!("Rejected par {} (3-5)", value),
                        }
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Distance (ft)");
                    let mut distance = i64::from(basket.distance);
                    if ui.add(egui::DragValue::new(&mut distance)).changed() {
                        if validate_distance(distance) {
                            action = PropertiesAction::UpdateBasket(
                                basket.id,
                                BasketMarkerUpdate {
                                    distance: Some(distance as u32),
                                    ..Default::default()
                                },
                            );
                        } else {
                            log::debug!("Rejected distance {}", distance);
                        }
                    }
                });
            });
        }
    });

    action
}

/// Label after an edit of the label field. The edit still holds the old
/// character, so the first other character is the one just typed, wherever
/// the cursor was.
fn edited_label(current: char, edited: &str) -> Option<char> {
    edited
        .chars()
        .filter_map(|c| normalize_label(&c.to_string()))
        .find(|&c| c != current)
        .or_else(|| normalize_label(edited))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_character_wins_at_either_end() {
        assert_eq!(edited_label('R', "Rx"), Some('X'));
        assert_eq!(edited_label('R', "xR"), Some('X'));
    }

    #[test]
    fn test_unchanged_or_cleared_label() {
        assert_eq!(edited_label('R', "R"), Some('R'));
        assert_eq!(edited_label('R', "r"), Some('R'));
        assert_eq!(edited_label('R', ""), None);
        assert_eq!(edited_label('R', " "), None);
    }

    #[test]
    fn test_replaced_label() {
        assert_eq!(edited_label('R', "a"), Some('A'));
    }
}
