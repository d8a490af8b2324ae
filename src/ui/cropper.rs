// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop step shown after a course image is loaded.
//!
//! The crop box keeps a 2:3 width to height ratio and never leaves the
//! image. Box coordinates are in source image pixels, so the on-screen
//! size of the window does not affect the crop.

use crate::io::media::CourseImage;
use image::RgbaImage;

/// Crop box width divided by height.
pub const ASPECT_RATIO: f32 = 2.0 / 3.0;

/// Smallest crop box width in image pixels.
pub const MIN_CROP_WIDTH: f32 = 50.0;

const INITIAL_WIDTH_FRACTION: f32 = 0.6;
const MAX_DISPLAY_SIZE: egui::Vec2 = egui::vec2(720.0, 520.0);
const HANDLE_SIZE: f32 = 16.0;

/// Crop rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropBox {
    /// Centered box 60% of the image width wide, shrunk to fit tall enough
    /// images.
    pub fn initial(image_width: f32, image_height: f32) -> Self {
        let mut width = image_width * INITIAL_WIDTH_FRACTION;
        let mut height = width / ASPECT_RATIO;
        if height > image_height {
            height = image_height;
            width = height * ASPECT_RATIO;
        }
        Self {
            x: (image_width - width) / 2.0,
            y: (image_height - height) / 2.0,
            width,
            height,
        }
    }

    /// Move the top-left corner to `(x, y)`, keeping the box inside the image.
    pub fn moved_to(self, x: f32, y: f32, image_width: f32, image_height: f32) -> Self {
        Self {
            x: x.clamp(0.0, (image_width - self.width).max(0.0)),
            y: y.clamp(0.0, (image_height - self.height).max(0.0)),
            ..self
        }
    }

    /// Resize so the right edge follows `right`. The ratio is kept, the width
    /// never drops below `MIN_CROP_WIDTH` and the box stays inside the image.
    pub fn resized_to(self, right: f32, image_width: f32, image_height: f32) -> Self {
        let mut width = (right - self.x).max(MIN_CROP_WIDTH);
        let mut height = width / ASPECT_RATIO;
        if self.x + width > image_width {
            width = image_width - self.x;
            height = width / ASPECT_RATIO;
        }
        if self.y + height > image_height {
            height = image_height - self.y;
            width = height * ASPECT_RATIO;
        }
        Self { width, height, ..self }
    }

    /// Whole-pixel `(x, y, width, height)` region, clipped to the image.
    pub fn pixel_region(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let x = (self.x.round().max(0.0) as u32).min(image_width.saturating_sub(1));
        let y = (self.y.round().max(0.0) as u32).min(image_height.saturating_sub(1));
        let width = (self.width.round().max(1.0) as u32).min(image_width - x);
        let height = (self.height.round().max(1.0) as u32).min(image_height - y);
        (x, y, width, height)
    }
}

/// Copy the region under `crop` out of `image`.
pub fn crop_image(image: &RgbaImage, crop: &CropBox) -> RgbaImage {
    let (x, y, width, height) = crop.pixel_region(image.width(), image.height());
    image::imageops::crop_imm(image, x, y, width, height).to_image()
}

/// Result of the crop window.
pub enum CropAction {
    None,
    Crop,
    UseFullImage,
    Cancel,
}

/// A loaded image waiting to be cropped.
pub struct Cropper {
    course: CourseImage,
    texture: egui::TextureHandle,
    crop_box: CropBox,
    /// Pointer offset from the box corner while moving, in image pixels
    drag_offset: Option<egui::Vec2>,
}

impl Cropper {
    pub fn new(ctx: &egui::Context, course: CourseImage) -> Self {
        let size = [course.pixels.width() as usize, course.pixels.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, course.pixels.as_raw());
        let texture = ctx.load_texture("crop_source", color_image, egui::TextureOptions::LINEAR);
        let crop_box = CropBox::initial(course.pixels.width() as f32, course.pixels.height() as f32);
        Self {
            course,
            texture,
            crop_box,
            drag_offset: None,
        }
    }

    /// The course image cut down to the crop box.
    pub fn into_cropped(self) -> CourseImage {
        let (x, y, width, height) = self
            .crop_box
            .pixel_region(self.course.pixels.width(), self.course.pixels.height());
        log::info!("Cropped course image to {}x{} at ({}, {})", width, height, x, y);
        CourseImage {
            pixels: crop_image(&self.course.pixels, &self.crop_box),
            reference: self.course.reference,
        }
    }

    pub fn into_full_image(self) -> CourseImage {
        self.course
    }

    /// Draw the crop window.
    pub fn show(&mut self, ctx: &egui::Context) -> CropAction {
        let mut action = CropAction::None;
        let mut open = true;

        egui::Window::new("Crop Image")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new("Drag and resize the box to select a 2:3 area")
                        .color(egui::Color32::from_gray(160)),
                );
                ui.add_space(8.0);
                self.crop_area(ui);
                ui.add_space(8.0);

                let (_, _, width, height) = self
                    .crop_box
                    .pixel_region(self.course.pixels.width(), self.course.pixels.height());
                ui.horizontal(|ui| {
                    ui.label(format!("{} × {} px", width, height));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Cancel").clicked() {
                            action = CropAction::Cancel;
                        }
                        if ui.button("Use Full Image").clicked() {
                            action = CropAction::UseFullImage;
                        }
                        if ui.button("Crop").clicked() {
                            action = CropAction::Crop;
                        }
                    });
                });
            });

        if !open {
            action = CropAction::Cancel;
        }
        action
    }

    fn crop_area(&mut self, ui: &mut egui::Ui) {
        let image_width = self.course.pixels.width() as f32;
        let image_height = self.course.pixels.height() as f32;
        let scale = (MAX_DISPLAY_SIZE.x / image_width)
            .min(MAX_DISPLAY_SIZE.y / image_height)
            .min(1.0);
        let (image_rect, _) = ui.allocate_exact_size(
            egui::vec2(image_width * scale, image_height * scale),
            egui::Sense::hover(),
        );

        let box_rect = |crop: &CropBox| {
            egui::Rect::from_min_size(
                image_rect.min + egui::vec2(crop.x, crop.y) * scale,
                egui::vec2(crop.width, crop.height) * scale,
            )
        };
        let to_image = |pointer: egui::Pos2| (pointer - image_rect.min) / scale;

        // The handle is registered last so it wins where it overlaps the box.
        let move_response = ui
            .interact(box_rect(&self.crop_box), ui.id().with("crop_move"), egui::Sense::drag())
            .on_hover_cursor(egui::CursorIcon::Grab);
        let handle_rect = egui::Rect::from_center_size(
            box_rect(&self.crop_box).max,
            egui::vec2(HANDLE_SIZE, HANDLE_SIZE),
        );
        let resize_response = ui
            .interact(handle_rect, ui.id().with("crop_resize"), egui::Sense::drag())
            .on_hover_cursor(egui::CursorIcon::ResizeNwSe);

        if resize_response.dragged() {
            if let Some(pointer) = resize_response.interact_pointer_pos() {
                self.crop_box = self
                    .crop_box
                    .resized_to(to_image(pointer).x, image_width, image_height);
            }
        } else if move_response.dragged() {
            if let Some(pointer) = move_response.interact_pointer_pos() {
                let pointer = to_image(pointer);
                let offset = *self
                    .drag_offset
                    .get_or_insert(pointer - egui::vec2(self.crop_box.x, self.crop_box.y));
                let corner = pointer - offset;
                self.crop_box = self.crop_box.moved_to(corner.x, corner.y, image_width, image_height);
            }
        } else {
            self.drag_offset = None;
        }

        let painter = ui.painter_at(image_rect);
        painter.image(
            self.texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Dim everything outside the crop box
        let crop_rect = box_rect(&self.crop_box);
        let shade = egui::Color32::from_black_alpha(128);
        for band in [
            egui::Rect::from_min_max(image_rect.min, egui::pos2(image_rect.max.x, crop_rect.min.y)),
            egui::Rect::from_min_max(egui::pos2(image_rect.min.x, crop_rect.max.y), image_rect.max),
            egui::Rect::from_min_max(
                egui::pos2(image_rect.min.x, crop_rect.min.y),
                egui::pos2(crop_rect.min.x, crop_rect.max.y),
            ),
            egui::Rect::from_min_max(
                egui::pos2(crop_rect.max.x, crop_rect.min.y),
                egui::pos2(image_rect.max.x, crop_rect.max.y),
            ),
        ] {
            painter.rect_filled(band, 0.0, shade);
        }

        // Rule of thirds grid
        let grid = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(80));
        for i in 1..3 {
            let t = i as f32 / 3.0;
            let x = crop_rect.min.x + crop_rect.width() * t;
            let y = crop_rect.min.y + crop_rect.height() * t;
            painter.line_segment([egui::pos2(x, crop_rect.min.y), egui::pos2(x, crop_rect.max.y)], grid);
            painter.line_segment([egui::pos2(crop_rect.min.x, y), egui::pos2(crop_rect.max.x, y)], grid);
        }

        painter.rect_stroke(crop_rect, 0.0, egui::Stroke::new(3.0, egui::Color32::WHITE));
        ui.painter().rect_filled(handle_rect, 2.0, egui::Color32::WHITE);
        ui.painter()
            .circle_filled(handle_rect.center(), HANDLE_SIZE / 2.0 - 3.0, egui::Color32::from_rgb(0x3b, 0x82, 0xf6));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn assert_approx(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 0.01, "{} != {}", actual, expected);
    }

    #[test]
    fn test_initial_box_is_centered_with_ratio() {
        let crop = CropBox::initial(300.0, 600.0);
        assert_approx(crop.width, 180.0);
        assert_approx(crop.height, 270.0);
        assert_approx(crop.x, 60.0);
        assert_approx(crop.y, 165.0);
    }

    #[test]
    fn test_initial_box_fits_wide_image() {
        let crop = CropBox::initial(1000.0, 300.0);
        assert_approx(crop.height, 300.0);
        assert_approx(crop.width, 200.0);
        assert_approx(crop.x, 400.0);
        assert_approx(crop.y, 0.0);
    }

    #[test]
    fn test_move_is_clamped_to_image() {
        let crop = CropBox::initial(300.0, 600.0).moved_to(-20.0, 1000.0, 300.0, 600.0);
        assert_approx(crop.x, 0.0);
        assert_approx(crop.y, 330.0);
        assert_approx(crop.width, 180.0);

        let crop = crop.moved_to(500.0, -5.0, 300.0, 600.0);
        assert_approx(crop.x, 120.0);
        assert_approx(crop.y, 0.0);
    }

    #[test]
    fn test_resize_enforces_minimum_width() {
        let crop = CropBox::initial(300.0, 600.0).resized_to(70.0, 300.0, 600.0);
        assert_approx(crop.width, MIN_CROP_WIDTH);
        assert_approx(crop.height, 75.0);
    }

    #[test]
    fn test_resize_stays_inside_image() {
        let crop = CropBox::initial(300.0, 600.0).resized_to(1000.0, 300.0, 600.0);
        assert_approx(crop.width, 240.0);
        assert_approx(crop.height, 360.0);

        let low = CropBox {
            x: 0.0,
            y: 400.0,
            width: 100.0,
            height: 150.0,
        };
        let crop = low.resized_to(300.0, 300.0, 600.0);
        assert_approx(crop.height, 200.0);
        assert_approx(crop.width, 133.33);
        assert!(crop.y + crop.height <= 600.0 + 0.01);
    }

    #[test]
    fn test_crop_output_size() {
        let mut image = RgbaImage::from_pixel(300, 600, Rgba([0, 0, 0, 255]));
        image.put_pixel(60, 165, Rgba([255, 0, 0, 255]));

        let crop = CropBox::initial(300.0, 600.0);
        let cropped = crop_image(&image, &crop);
        assert_eq!(cropped.dimensions(), (180, 270));
        assert_eq!(cropped.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_pixel_region_never_leaves_image() {
        let crop = CropBox {
            x: 290.0,
            y: 590.0,
            width: 50.0,
            height: 75.0,
        };
        assert_eq!(crop.pixel_region(300, 600), (290, 590, 10, 10));
    }
}
