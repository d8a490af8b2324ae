// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the sign store and placement controller,
//! routes actions from the UI components to them, and runs image loading
//! and export on background threads.

use crate::config::AppConfig;
use crate::export::{self, DiskSaver, ExportError};
use crate::io::media::{self, CourseImage};
use crate::placement::{Placed, PlacementController};
use crate::render::{PreviewSurface, TinySkiaRasterizer};
use crate::store::SignStore;
use crate::ui::{
    canvas,
    cropper::{CropAction, Cropper},
    preview::PreviewPanel,
    properties, toolbar,
};
use crate::util::color::parse_css_color;
use image::RgbaImage;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

const FALLBACK_BACKGROUND: [u8; 4] = [0x1f, 0x29, 0x37, 0xff];

/// Message shown in the status bar.
enum Status {
    Info(String),
    Error(String),
}

/// Main application state.
pub struct TeeSignApp {
    /// Sign state
    store: SignStore,

    /// Which marker the next canvas click places
    placement: PlacementController,

    config: AppConfig,

    rasterizer: Arc<TinySkiaRasterizer>,

    /// Course image texture for the canvas
    image_texture: Option<egui::TextureHandle>,

    /// Decoded course image, shared with preview and export
    course_image: Option<Arc<RgbaImage>>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<CourseImage, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Freshly loaded image waiting for the crop step
    cropper: Option<Cropper>,

    /// Receiver for the export in flight
    export_job: Option<Receiver<Result<PathBuf, ExportError>>>,

    status: Option<Status>,

    preview: PreviewPanel,
    show_preview: bool,

    /// Set by the store subscription when the preview must be re-rendered
    preview_dirty: Rc<Cell<bool>>,

    preview_background: [u8; 4],
}

impl TeeSignApp {
    /// Create a new application instance.
    pub fn new(config: AppConfig) -> Self {
        let preview_dirty = Rc::new(Cell::new(true));
        let mut store = SignStore::new();
        let flag = Rc::clone(&preview_dirty);
        store.subscribe(Box::new(move |_| flag.set(true)));

        let preview_background = parse_css_color(&config.export.background_color).unwrap_or_else(|e| {
            log::warn!("Invalid background color in config: {}", e);
            FALLBACK_BACKGROUND
        });
        let rasterizer = Arc::new(TinySkiaRasterizer::with_font_path(config.font_path.as_deref()));

        Self {
            store,
            placement: PlacementController::new(),
            config,
            rasterizer,
            image_texture: None,
            course_image: None,
            image_loader: None,
            loading_message: None,
            cropper: None,
            export_job: None,
            status: None,
            preview: PreviewPanel::default(),
            show_preview: false,
            preview_dirty,
            preview_background,
        }
    }

    /// Snapshot of the sign for preview or export, if an image is loaded.
    fn surface(&self) -> Option<PreviewSurface> {
        let state = self.store.state();
        state.uploaded_image.as_ref()?;
        let image = self.course_image.as_ref()?;
        Some(PreviewSurface::new(state.clone(), Arc::clone(image)))
    }

    /// Ask for an image file and load it.
    fn open_image_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png", "webp"])
            .pick_file()
        {
            self.load_image_file(path);
        }
    }

    /// Load a course image on a background thread.
    pub fn load_image_file(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let result = media::ingest(&path).map_err(|e| format!("{:#}", e));
            if let Ok(ref course) = result {
                log::info!(
                    "Loaded image: {} ({}x{})",
                    path.display(),
                    course.pixels.width(),
                    course.pixels.height()
                );
            }
            let _ = sender.send(result);
        });
    }

    /// Make `course` the sign's course image.
    fn accept_course_image(&mut self, ctx: &egui::Context, course: CourseImage) {
        let size = [course.pixels.width() as usize, course.pixels.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, course.pixels.as_raw());
        self.image_texture = Some(ctx.load_texture("course_image", color_image, egui::TextureOptions::LINEAR));
        self.course_image = Some(Arc::new(course.pixels));
        // Same path can come back with different pixels.
        self.preview_dirty.set(true);
        self.store.set_uploaded_image(Some(course.reference));
        self.status = None;
    }

    /// Run the crop window and apply its outcome.
    fn show_cropper(&mut self, ctx: &egui::Context) {
        let Some(cropper) = self.cropper.as_mut() else {
            return;
        };
        match cropper.show(ctx) {
            CropAction::None => {}
            CropAction::Crop => {
                if let Some(cropper) = self.cropper.take() {
                    self.accept_course_image(ctx, cropper.into_cropped());
                }
            }
            CropAction::UseFullImage => {
                if let Some(cropper) = self.cropper.take() {
                    self.accept_course_image(ctx, cropper.into_full_image());
                }
            }
            CropAction::Cancel => {
                self.cropper = None;
                self.status = None;
                log::info!("Image crop cancelled");
            }
        }
    }

    /// Return to the upload screen.
    fn change_image(&mut self) {
        self.placement.cancel();
        self.store.set_uploaded_image(None);
        self.image_texture = None;
        self.course_image = None;
    }

    /// Ask for a destination and start exporting in the background.
    fn begin_export(&mut self) {
        if self.export_job.is_some() {
            return;
        }
        let Some(surface) = self.surface() else {
            self.status = Some(Status::Error("Upload a course image before exporting".to_string()));
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(self.config.export.file_name.as_str())
            .save_file()
        else {
            return;
        };

        let directory = path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut options = self.config.export.clone();
        if let Some(name) = path.file_name() {
            options.file_name = name.to_string_lossy().to_string();
        }

        log::info!("Exporting tee sign to {}", path.display());
        self.status = Some(Status::Info("Exporting...".to_string()));
        self.export_job = Some(export::spawn_export(
            surface,
            options,
            self.rasterizer.clone(),
            Box::new(DiskSaver::new(directory)),
        ));
    }

    fn clear_markers(&mut self) {
        self.placement.cancel();
        self.store.clear_markers();
        log::info!("Cleared markers");
    }

    fn reset(&mut self) {
        self.placement.cancel();
        self.cropper = None;
        self.store.reset();
        self.image_texture = None;
        self.course_image = None;
        self.status = None;
        log::info!("Reset tee sign");
    }

    /// Collect results from background jobs.
    fn poll_jobs(&mut self, ctx: &egui::Context) {
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                self.loading_message = None;

                match result {
                    Ok(course) => {
                        self.status = Some(Status::Info("Crop the image or use it as is".to_string()));
                        self.cropper = Some(Cropper::new(ctx, course));
                    }
                    Err(e) => {
                        log::error!("Failed to load image: {}", e);
                        self.status = Some(Status::Error(e));
                    }
                }
            }
        }

        if let Some(ref receiver) = self.export_job {
            if let Ok(result) = receiver.try_recv() {
                self.export_job = None;
                self.status = Some(match result {
                    Ok(path) => Status::Info(format!("Saved {}", path.display())),
                    Err(e) => Status::Error(e.to_string()),
                });
            }
        }

        if self.loading_message.is_some() || self.export_job.is_some() {
            ctx.request_repaint();
        }
    }

    fn handle_toolbar(&mut self, action: toolbar::ToolbarAction) {
        let result = match action {
            toolbar::ToolbarAction::None => Ok(()),
            toolbar::ToolbarAction::BeginTee => self.placement.begin_tee(self.store.state()),
            toolbar::ToolbarAction::BeginBasket(color) => self.placement.begin_basket(color, self.store.state()),
            toolbar::ToolbarAction::CancelPlacement => {
                self.placement.cancel();
                Ok(())
            }
            toolbar::ToolbarAction::ClearMarkers => {
                self.clear_markers();
                Ok(())
            }
            toolbar::ToolbarAction::ChangeImage => {
                self.change_image();
                Ok(())
            }
            toolbar::ToolbarAction::Export => {
                self.begin_export();
                Ok(())
            }
            toolbar::ToolbarAction::TogglePreview => {
                self.show_preview = !self.show_preview;
                Ok(())
            }
        };

        if let Err(e) = result {
            log::warn!("Cannot start placement: {}", e);
            self.status = Some(Status::Error(e.to_string()));
        }
    }

    fn handle_canvas(&mut self, action: canvas::CanvasAction) {
        match action {
            canvas::CanvasAction::Click(pointer, image_rect) => {
                match self.placement.handle_click(&mut self.store, pointer, image_rect) {
                    Some(Placed::Tee(id)) => log::debug!("Tee {} placed", id),
                    Some(Placed::Basket(id)) => {
                        if let Some(basket) = self.store.state().basket(id) {
                            log::debug!("{} basket {} placed", basket.color.style().name, id);
                        }
                    }
                    None => {}
                }
            }
            canvas::CanvasAction::MoveTee(position) => self.store.move_tee_marker(position),
            canvas::CanvasAction::MoveBasket(id, position) => self.store.move_basket_marker(id, position),
            canvas::CanvasAction::OpenImage => self.open_image_dialog(),
            canvas::CanvasAction::None => {}
        }
    }

    fn handle_properties(&mut self, action: properties::PropertiesAction) {
        match action {
            properties::PropertiesAction::SetHoleNumber(n) => self.store.set_hole_number(n),
            properties::PropertiesAction::UpdateTee(update) => self.store.update_tee_marker(update),
            properties::PropertiesAction::UpdateBasket(id, update) => self.store.update_basket_marker(id, update),
            properties::PropertiesAction::RemoveBasket(id) => {
                self.store.remove_basket_marker(id);
                log::info!("Removed basket, total: {}", self.store.state().basket_markers.len());
            }
            properties::PropertiesAction::None => {}
        }
    }
}

impl eframe::App for TeeSignApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Course Image...").clicked() {
                        ui.close_menu();
                        self.open_image_dialog();
                    }
                    let can_export = self.surface().is_some() && self.export_job.is_none();
                    if ui.add_enabled(can_export, egui::Button::new("Export Tee Sign...")).clicked() {
                        ui.close_menu();
                        self.begin_export();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let has_markers = self.store.state().has_markers();
                    if ui.add_enabled(has_markers, egui::Button::new("Clear Markers")).clicked() {
                        self.clear_markers();
                        ui.close_menu();
                    }
                    if ui.button("Reset").clicked() {
                        self.reset();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.show_preview, "Preview").clicked() {
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(ui, self.store.state(), &self.placement, self.export_job.is_some())
            })
            .inner;
        self.handle_toolbar(toolbar_action);

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let state = self.store.state();
                ui.label(format!("Hole {}", state.hole_number));
                ui.separator();
                ui.label(format!(
                    "Tee: {}  Baskets: {}/{}",
                    if state.tee_marker.is_some() { "placed" } else { "none" },
                    state.basket_markers.len(),
                    crate::placement::MAX_BASKETS
                ));
                ui.separator();
                match &self.status {
                    Some(Status::Info(message)) => {
                        ui.label(message);
                    }
                    Some(Status::Error(message)) => {
                        ui.colored_label(egui::Color32::LIGHT_RED, message);
                    }
                    None => {
                        ui.label(if state.uploaded_image.is_some() { "Ready" } else { "No image loaded" });
                    }
                }
            });
        });

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| properties::show(ui, self.store.state()))
            .inner;
        self.handle_properties(properties_action);

        // Escape cancels a placement in progress
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && self.placement.is_placing() {
            self.placement.cancel();
            log::debug!("Placement cancelled");
        }

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    canvas::CanvasAction::None
                } else {
                    let size = self.course_image.as_ref().map(|image| image.dimensions());
                    canvas::show(ui, self.store.state(), self.placement.mode(), &self.image_texture, size)
                }
            })
            .inner;
        self.handle_canvas(canvas_action);

        self.show_cropper(ctx);

        // Preview window
        if self.show_preview {
            if self.preview_dirty.replace(false) {
                let surface = self.surface();
                self.preview
                    .refresh(ctx, surface.as_ref(), &self.rasterizer, self.preview_background);
            }
            self.preview.show(ctx, &mut self.show_preview);
        }
    }
}
