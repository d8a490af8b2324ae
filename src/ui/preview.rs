// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tee sign preview window.
//!
//! Shows the same rendering that export produces, at scale 1. The texture
//! is rebuilt only when the sign state or course image changed.

use crate::render::{PreviewSurface, TinySkiaRasterizer};

/// Cached preview texture.
#[derive(Default)]
pub struct PreviewPanel {
    texture: Option<egui::TextureHandle>,
    error: Option<String>,
}

impl PreviewPanel {
    /// Re-render the preview from `surface`.
    pub fn refresh(
        &mut self,
        ctx: &egui::Context,
        surface: Option<&PreviewSurface>,
        rasterizer: &TinySkiaRasterizer,
        background: [u8; 4],
    ) {
        let Some(surface) = surface else {
            self.texture = None;
            self.error = None;
            return;
        };

        match rasterizer.render(surface, 1.0, background) {
            Ok(image) => {
                let size = [image.width() as usize, image.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
                self.texture = Some(ctx.load_texture("tee_sign_preview", color_image, egui::TextureOptions::LINEAR));
                self.error = None;
            }
            Err(e) => {
                log::error!("Failed to render preview: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Draw the preview window.
    pub fn show(&self, ctx: &egui::Context, open: &mut bool) {
        egui::Window::new("Tee Sign Preview")
            .open(open)
            .default_width(820.0)
            .resizable(true)
            .show(ctx, |ui| {
                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::LIGHT_RED, error);
                }
                match &self.texture {
                    Some(texture) => {
                        egui::ScrollArea::both().show(ui, |ui| {
                            let size = texture.size_vec2();
                            let width = ui.available_width().min(size.x).max(1.0);
                            let scaled = egui::vec2(width, size.y * width / size.x);
                            ui.add(egui::Image::new(egui::load::SizedTexture::new(texture.id(), scaled)));
                        });
                    }
                    None => {
                        ui.label(
                            egui::RichText::new("Upload an image and add markers to see the preview")
                                .color(egui::Color32::from_gray(160)),
                        );
                    }
                }
            });
    }
}
