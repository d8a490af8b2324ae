// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Static tee sign rendering.
//!
//! The sign is laid out at a logical width of 800 pixels and multiplied by
//! the export scale: a header with the hole number and basket details, the
//! course map with markers, and a legend. Shapes are rasterized with
//! tiny-skia; text is drawn afterwards with imageproc when a font is
//! available.

use crate::export::Rasterizer;
use crate::models::{marker::BasketColor, sign::HoleSignState};
use crate::util::geometry::position_to_pixels;
use ab_glyph::FontArc;
use anyhow::{anyhow, bail, Result};
use image::{imageops::FilterType, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;
use std::sync::Arc;
use tiny_skia::{
    Color, ColorU8, FillRule, GradientStop, LinearGradient, Mask, Paint, Path as SkPath, PathBuilder, Pixmap,
    PixmapPaint, Point, Rect, SpreadMode, Stroke, Transform,
};

pub const SIGN_WIDTH: f32 = 800.0;
const HEADER_HEIGHT: f32 = 120.0;
const MAP_PADDING: f32 = 16.0;
const LEGEND_HEIGHT: f32 = 56.0;
const CORNER_RADIUS: f32 = 8.0;
const BASKET_RADIUS: f32 = 24.0;
const MARKER_BORDER: f32 = 4.0;
const TEE_CORNER_RADIUS: f32 = 8.0;
const HEADER_COLUMN_WIDTH: f32 = 180.0;
const LEGEND_SLOT_WIDTH: f32 = 180.0;

const HEADER_FROM: [u8; 4] = [0x25, 0x63, 0xeb, 0xff];
const HEADER_TO: [u8; 4] = [0x1d, 0x4e, 0xd8, 0xff];
const MAP_BACKGROUND: [u8; 4] = [0x11, 0x18, 0x27, 0xff];
const LEGEND_BACKGROUND: [u8; 4] = [0x37, 0x41, 0x51, 0xff];
const TEE_FILL: [u8; 4] = [0x6b, 0x72, 0x80, 0xff];
const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const LEGEND_TEXT: [u8; 4] = [0xf3, 0xf4, 0xf6, 0xff];

/// Everything needed to render a sign: a snapshot of the state and the
/// decoded course image. Owned so it can move to a worker thread.
#[derive(Clone)]
pub struct PreviewSurface {
    pub state: HoleSignState,
    pub image: Arc<RgbaImage>,
}

impl PreviewSurface {
    pub fn new(state: HoleSignState, image: Arc<RgbaImage>) -> Self {
        Self { state, image }
    }
}

/// Pixel-space placement of the sign sections for a given scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignLayout {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub header: egui::Rect,
    pub map: egui::Rect,
    pub image: egui::Rect,
    pub legend: egui::Rect,
}

impl SignLayout {
    pub fn compute(image_width: u32, image_height: u32, scale: f32) -> Result<Self> {
        if image_width == 0 || image_height == 0 {
            bail!("course image has no pixels");
        }
        if !(scale.is_finite() && scale > 0.0) {
            bail!("scale must be positive, got {}", scale);
        }

        let width = SIGN_WIDTH * scale;
        let padding = MAP_PADDING * scale;
        let header = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(width, HEADER_HEIGHT * scale));

        let image_w = width - 2.0 * padding;
        let image_h = image_w * image_height as f32 / image_width as f32;
        let image = egui::Rect::from_min_size(
            egui::pos2(padding, header.max.y + padding),
            egui::vec2(image_w, image_h),
        );
        let map = egui::Rect::from_min_max(
            egui::pos2(0.0, header.max.y),
            egui::pos2(width, image.max.y + padding),
        );
        let legend = egui::Rect::from_min_size(
            egui::pos2(0.0, map.max.y),
            egui::vec2(width, LEGEND_HEIGHT * scale),
        );

        Ok(Self {
            width: width.round() as u32,
            height: legend.max.y.ceil() as u32,
            scale,
            header,
            map,
            image,
            legend,
        })
    }
}

/// Rasterizer for the static sign, backed by tiny-skia.
pub struct TinySkiaRasterizer {
    font: Option<FontArc>,
}

impl TinySkiaRasterizer {
    pub fn new(font: Option<FontArc>) -> Self {
        Self { font }
    }

    /// Use the configured font, falling back to the first system font found.
    pub fn with_font_path(font_path: Option<&Path>) -> Self {
        let font = font_path.and_then(load_font_file).or_else(load_system_font);
        if font.is_none() {
            log::warn!("No font available, sign text will not be drawn");
        }
        Self::new(font)
    }

    /// Render the sign. Fails on invalid layout input or allocation failure.
    pub fn render(&self, surface: &PreviewSurface, scale: f32, background: [u8; 4]) -> Result<RgbaImage> {
        let layout = SignLayout::compute(surface.image.width(), surface.image.height(), scale)?;
        let mut pixmap = Pixmap::new(layout.width, layout.height)
            .ok_or_else(|| anyhow!("cannot allocate {}x{} pixmap", layout.width, layout.height))?;
        pixmap.fill(color(background));

        let mut clip = Mask::new(layout.width, layout.height).ok_or_else(|| anyhow!("cannot allocate mask"))?;
        let outline = rounded_rect(
            0.0,
            0.0,
            layout.width as f32,
            layout.height as f32,
            CORNER_RADIUS * scale,
        )?;
        clip.fill_path(&outline, FillRule::Winding, true, Transform::identity());

        draw_sections(&mut pixmap, &layout, &clip)?;
        draw_course_image(&mut pixmap, &surface.image, &layout, &clip)?;
        draw_tee(&mut pixmap, &surface.state, &layout)?;
        draw_baskets(&mut pixmap, &surface.state, &layout)?;
        draw_legend_swatches(&mut pixmap, &surface.state, &layout)?;

        let mut output = RgbaImage::new(layout.width, layout.height);
        for (dst, src) in output.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }

        if let Some(font) = &self.font {
            draw_text(&mut output, font, &surface.state, &layout);
        }

        Ok(output)
    }
}

impl Rasterizer for TinySkiaRasterizer {
    fn rasterize(&self, surface: &PreviewSurface, scale: f32, background: [u8; 4]) -> Result<Option<RgbaImage>> {
        self.render(surface, scale, background).map(Some)
    }
}

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn solid(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgba));
    paint.anti_alias = true;
    paint
}

fn sk_rect(rect: egui::Rect) -> Result<Rect> {
    Rect::from_xywh(rect.min.x, rect.min.y, rect.width(), rect.height())
        .ok_or_else(|| anyhow!("invalid rectangle {:?}", rect))
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Result<SkPath> {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish().ok_or_else(|| anyhow!("cannot build rounded rectangle"))
}

fn circle(cx: f32, cy: f32, radius: f32) -> Result<SkPath> {
    PathBuilder::from_circle(cx, cy, radius).ok_or_else(|| anyhow!("cannot build circle"))
}

fn draw_sections(pixmap: &mut Pixmap, layout: &SignLayout, clip: &Mask) -> Result<()> {
    let gradient = LinearGradient::new(
        Point::from_xy(layout.header.min.x, 0.0),
        Point::from_xy(layout.header.max.x, 0.0),
        vec![
            GradientStop::new(0.0, color(HEADER_FROM)),
            GradientStop::new(1.0, color(HEADER_TO)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| anyhow!("cannot build header gradient"))?;
    let mut header_paint = Paint::default();
    header_paint.shader = gradient;

    pixmap.fill_rect(sk_rect(layout.header)?, &header_paint, Transform::identity(), Some(clip));
    pixmap.fill_rect(sk_rect(layout.map)?, &solid(MAP_BACKGROUND), Transform::identity(), Some(clip));
    pixmap.fill_rect(sk_rect(layout.legend)?, &solid(LEGEND_BACKGROUND), Transform::identity(), Some(clip));
    Ok(())
}

fn draw_course_image(pixmap: &mut Pixmap, image: &RgbaImage, layout: &SignLayout, clip: &Mask) -> Result<()> {
    let target_w = layout.image.width().round().max(1.0) as u32;
    let target_h = layout.image.height().round().max(1.0) as u32;
    let resized = image::imageops::resize(image, target_w, target_h, FilterType::Triangle);

    let mut course = Pixmap::new(target_w, target_h)
        .ok_or_else(|| anyhow!("cannot allocate {}x{} image pixmap", target_w, target_h))?;
    for (dst, src) in course.pixels_mut().iter_mut().zip(resized.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    pixmap.draw_pixmap(
        layout.image.min.x.round() as i32,
        layout.image.min.y.round() as i32,
        course.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        Some(clip),
    );
    Ok(())
}

fn draw_tee(pixmap: &mut Pixmap, state: &HoleSignState, layout: &SignLayout) -> Result<()> {
    let Some(tee) = &state.tee_marker else {
        return Ok(());
    };
    let s = layout.scale;
    let center = position_to_pixels(tee.position, layout.image);
    let w = tee.width as f32 * s;
    let h = tee.height as f32 * s;
    let path = rounded_rect(center.x - w / 2.0, center.y - h / 2.0, w, h, TEE_CORNER_RADIUS * s)?;
    let transform = Transform::from_rotate_at(tee.rotation as f32, center.x, center.y);

    pixmap.fill_path(&path, &solid(TEE_FILL), FillRule::Winding, transform, None);
    let stroke = Stroke {
        width: MARKER_BORDER * s,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &solid(WHITE), &stroke, transform, None);
    Ok(())
}

fn draw_basket_circle(pixmap: &mut Pixmap, color_key: BasketColor, cx: f32, cy: f32, radius: f32, border: f32) -> Result<()> {
    let style = color_key.style();
    let fill = circle(cx, cy, radius)?;
    pixmap.fill_path(&fill, &solid(style.fill), FillRule::Winding, Transform::identity(), None);
    let ring = circle(cx, cy, (radius - border / 2.0).max(0.5))?;
    let stroke = Stroke {
        width: border,
        ..Default::default()
    };
    pixmap.stroke_path(&ring, &solid(style.border), &stroke, Transform::identity(), None);
    Ok(())
}

fn draw_baskets(pixmap: &mut Pixmap, state: &HoleSignState, layout: &SignLayout) -> Result<()> {
    let s = layout.scale;
    for basket in &state.basket_markers {
        let center = position_to_pixels(basket.position, layout.image);
        draw_basket_circle(pixmap, basket.color, center.x, center.y, BASKET_RADIUS * s, MARKER_BORDER * s)?;
    }
    Ok(())
}

/// Left edges of the legend slots: the tee (if any) then each basket,
/// centered as a group.
fn legend_slots(state: &HoleSignState, layout: &SignLayout) -> Vec<f32> {
    let count = usize::from(state.tee_marker.is_some()) + state.basket_markers.len();
    let slot = LEGEND_SLOT_WIDTH * layout.scale;
    let start = layout.legend.center().x - slot * count as f32 / 2.0;
    (0..count).map(|i| start + slot * i as f32).collect()
}

fn draw_legend_swatches(pixmap: &mut Pixmap, state: &HoleSignState, layout: &SignLayout) -> Result<()> {
    let s = layout.scale;
    let cy = layout.legend.center().y;
    let mut slots = legend_slots(state, layout).into_iter();

    if state.tee_marker.is_some() {
        if let Some(x) = slots.next() {
            let path = rounded_rect(x, cy - 10.0 * s, 32.0 * s, 20.0 * s, 4.0 * s)?;
            pixmap.fill_path(&path, &solid(TEE_FILL), FillRule::Winding, Transform::identity(), None);
            let stroke = Stroke {
                width: 2.0 * s,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &solid(WHITE), &stroke, Transform::identity(), None);
        }
    }

    for (basket, x) in state.basket_markers.iter().zip(slots) {
        draw_basket_circle(pixmap, basket.color, x + 12.0 * s, cy, 12.0 * s, 2.0 * s)?;
    }
    Ok(())
}

fn draw_centered(image: &mut RgbaImage, font: &FontArc, text: &str, center_x: f32, top: f32, size: f32, rgba: [u8; 4]) {
    let (w, _) = text_size(size, font, text);
    draw_text_mut(
        image,
        Rgba(rgba),
        (center_x - w as f32 / 2.0).round() as i32,
        top.round() as i32,
        size,
        font,
        text,
    );
}

fn draw_text(image: &mut RgbaImage, font: &FontArc, state: &HoleSignState, layout: &SignLayout) {
    let s = layout.scale;
    let header_x = layout.header.center().x;
    draw_centered(image, font, &format!("Hole {}", state.hole_number), header_x, 14.0 * s, 40.0 * s, WHITE);

    let column = HEADER_COLUMN_WIDTH * s;
    let first = header_x - column * state.basket_markers.len() as f32 / 2.0 + column / 2.0;
    for (i, basket) in state.basket_markers.iter().enumerate() {
        let x = first + column * i as f32;
        draw_centered(image, font, basket.color.style().legend, x, 60.0 * s, 12.0 * s, WHITE);
        draw_centered(image, font, &format!("Par {}", basket.par), x, 74.0 * s, 24.0 * s, WHITE);
        draw_centered(image, font, &format!("{} ft", basket.distance), x, 98.0 * s, 14.0 * s, WHITE);
    }

    for basket in &state.basket_markers {
        let center = position_to_pixels(basket.position, layout.image);
        let label = basket.label.to_string();
        let size = 16.0 * s;
        draw_centered(image, font, &label, center.x, center.y - size / 2.0, size, basket.color.style().text);
    }

    let cy = layout.legend.center().y;
    let text_size_px = 14.0 * s;
    let text_top = cy - text_size_px / 2.0;
    let mut slots = legend_slots(state, layout).into_iter();
    if state.tee_marker.is_some() {
        if let Some(x) = slots.next() {
            draw_text_mut(image, Rgba(LEGEND_TEXT), (x + 40.0 * s) as i32, text_top as i32, text_size_px, font, "Tee Pad");
        }
    }
    for (basket, x) in state.basket_markers.iter().zip(slots) {
        let style = basket.color.style();
        draw_centered(image, font, &basket.label.to_string(), x + 12.0 * s, cy - 5.0 * s, 10.0 * s, style.text);
        draw_text_mut(image, Rgba(LEGEND_TEXT), (x + 32.0 * s) as i32, text_top as i32, text_size_px, font, style.legend);
    }
}

fn load_font_file(path: &Path) -> Option<FontArc> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Cannot read font {}: {}", path.display(), e);
            return None;
        }
    };
    match FontArc::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("Cannot parse font {}: {}", path.display(), e);
            None
        }
    }
}

fn load_system_font() -> Option<FontArc> {
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Helvetica.ttf",
        "C:\\Windows\\Fonts\\arialbd.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                log::debug!("Using font {}", path);
                return Some(font);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::marker::{BasketMarker, Par, Position, TeeMarker};

    fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(a.abs_diff(*e) <= 1, "{:?} != {:?}", actual, expected);
        }
    }

    fn surface(state: HoleSignState) -> PreviewSurface {
        let image = RgbaImage::from_pixel(200, 100, Rgba([0, 128, 0, 255]));
        PreviewSurface::new(state, Arc::new(image))
    }

    #[test]
    fn test_layout_scales_with_image_aspect() {
        let layout = SignLayout::compute(200, 100, 1.0).unwrap();
        assert_eq!(layout.width, 800);
        assert_eq!(layout.image.width(), 768.0);
        assert_eq!(layout.image.height(), 384.0);
        assert_eq!(layout.height, (120.0 + 384.0 + 32.0 + 56.0) as u32);

        let doubled = SignLayout::compute(200, 100, 2.0).unwrap();
        assert_eq!(doubled.width, 1600);
        assert_eq!(doubled.height, layout.height * 2);
    }

    #[test]
    fn test_layout_rejects_bad_input() {
        assert!(SignLayout::compute(0, 100, 1.0).is_err());
        assert!(SignLayout::compute(100, 100, 0.0).is_err());
        assert!(SignLayout::compute(100, 100, f32::NAN).is_err());
    }

    #[test]
    fn test_render_draws_markers_at_percent_positions() {
        let mut state = HoleSignState::default();
        state.tee_marker = Some(TeeMarker::new(Position::new(20.0, 20.0)));
        state
            .basket_markers
            .push(BasketMarker::new(BasketColor::Red, Position::new(75.0, 60.0), Par::Three, 250));

        let rasterizer = TinySkiaRasterizer::new(None);
        let image = rasterizer.render(&surface(state), 1.0, [0x1f, 0x29, 0x37, 0xff]).unwrap();
        let layout = SignLayout::compute(200, 100, 1.0).unwrap();

        let basket = position_to_pixels(Position::new(75.0, 60.0), layout.image);
        assert_eq!(image.get_pixel(basket.x as u32, basket.y as u32).0, [0xdc, 0x26, 0x26, 0xff]);

        let tee = position_to_pixels(Position::new(20.0, 20.0), layout.image);
        assert_eq!(image.get_pixel(tee.x as u32, tee.y as u32).0, TEE_FILL);

        let empty = position_to_pixels(Position::new(50.0, 90.0), layout.image);
        assert_close(image.get_pixel(empty.x as u32, empty.y as u32).0, [0, 128, 0, 255]);
    }

    #[test]
    fn test_background_shows_in_rounded_corners() {
        let rasterizer = TinySkiaRasterizer::new(None);
        let image = rasterizer
            .render(&surface(HoleSignState::default()), 2.0, [10, 20, 30, 255])
            .unwrap();
        assert_eq!(image.dimensions(), (1600, 1184));
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert_close(image.get_pixel(800, 600).0, [0, 128, 0, 255]);
    }

    #[test]
    fn test_rasterize_wraps_output() {
        let rasterizer = TinySkiaRasterizer::new(None);
        let out = rasterizer
            .rasterize(&surface(HoleSignState::default()), 1.0, [0, 0, 0, 255])
            .unwrap();
        assert!(out.is_some());
    }
}
