//! # Compass Rendering
//!
//! Maps a logical centroid onto the compass picture and draws the marker.
//!
//! The logical space `[-1, 1] x [-1, 1]` is stretched over a pixel rectangle
//! of the base image. The y axis is flipped: logical `+1` is the top edge.

use crate::centroid::Centroid;
use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pixel rectangle covered by the logical compass on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub x_start: f64,
    pub x_end: f64,
    pub y_start: f64,
    pub y_end: f64,
}

impl Default for PixelBounds {
    /// Axis extents of the stock compass picture.
    fn default() -> Self {
        Self {
            x_start: 147.0,
            x_end: 1049.0,
            y_start: 180.0,
            y_end: 1084.0,
        }
    }
}

impl PixelBounds {
    /// Pixel position of a logical point, rounded to the nearest pixel.
    pub fn to_pixel(&self, point: Centroid) -> (i32, i32) {
        let px = self.x_start + ((point.x + 1.0) / 2.0) * (self.x_end - self.x_start);
        let py = self.y_start + ((1.0 - point.y) / 2.0) * (self.y_end - self.y_start);
        (px.round() as i32, py.round() as i32)
    }
}

/// Marker geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: i32,
    pub font_size: f32,
    /// Gap between the marker edge and the label.
    pub text_offset: i32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 10,
            font_size: 20.0,
            text_offset: 15,
        }
    }
}

/// Fonts tried, in order, when none is configured.
fn system_font_candidates() -> Vec<PathBuf> {
    let names = [
        "DejaVuSans-Bold.ttf",
        "DejaVuSans.ttf",
        "LiberationSans-Bold.ttf",
        "LiberationSans-Regular.ttf",
        "Arial Bold.ttf",
        "Arial.ttf",
    ];

    let mut dirs_to_search: Vec<PathBuf> = Vec::new();
    if let Some(dir) = dirs::font_dir() {
        dirs_to_search.push(dir);
    }
    dirs_to_search.extend(
        [
            "/usr/share/fonts/truetype/dejavu",
            "/usr/share/fonts/TTF",
            "/usr/share/fonts/dejavu",
            "/usr/share/fonts/truetype/liberation",
            "/usr/share/fonts/liberation",
            "/Library/Fonts",
            "/System/Library/Fonts/Supplemental",
            "C:\\Windows\\Fonts",
        ]
        .iter()
        .map(PathBuf::from),
    );

    dirs_to_search
        .iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .collect()
}

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> Result<FontVec> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
    FontVec::try_from_vec(bytes).with_context(|| format!("Invalid font file {}", path.display()))
}

/// Resolve the label font: the configured one, else the first system font
/// found. `None` means the label will not be drawn.
pub fn resolve_font(configured: Option<&Path>) -> Option<FontVec> {
    if let Some(path) = configured {
        match load_font(path) {
            Ok(font) => return Some(font),
            Err(e) => warn!("{e:#}; falling back to system fonts"),
        }
    }

    for candidate in system_font_candidates() {
        if candidate.is_file() {
            match load_font(&candidate) {
                Ok(font) => {
                    debug!("Using label font {}", candidate.display());
                    return Some(font);
                }
                Err(e) => debug!("{e:#}"),
            }
        }
    }

    warn!("No usable font found; the marker will be drawn without its coordinate label");
    None
}

/// Draw the centroid marker, and its label when a font is available, onto
/// `canvas`.
pub fn draw_marker(
    canvas: &mut RgbaImage,
    centroid: Centroid,
    pixel: (i32, i32),
    style: &MarkerStyle,
    font: Option<&FontVec>,
) {
    draw_filled_circle_mut(canvas, pixel, style.radius, RED);
    draw_hollow_circle_mut(canvas, pixel, style.radius, BLACK);

    let Some(font) = font else {
        return;
    };

    let text = format!("{centroid:.3}");
    let scale = PxScale::from(style.font_size);
    let x = pixel.0 + style.radius + style.text_offset;
    let y = pixel.1 - (style.font_size as i32) / 2;

    let (width, height) = text_size(scale, font, &text);
    let background = Rect::at(x, y).of_size(width.max(1), height.max(1));
    draw_filled_rect_mut(canvas, background, WHITE);
    draw_text_mut(canvas, RED, x, y, scale, font, &text);
}

/// Copy `base_image` with the centroid marked on it to `output_path`.
///
/// Returns the pixel the marker was drawn at.
///
/// # Errors
///
/// Fails when the base image cannot be decoded or the output cannot be
/// written. The output format follows the output file extension; formats
/// without an alpha channel (JPEG) get the marked picture flattened to RGB.
pub fn plot_centroid(
    base_image: &Path,
    output_path: &Path,
    centroid: Centroid,
    bounds: &PixelBounds,
    style: &MarkerStyle,
    font: Option<&FontVec>,
) -> Result<(i32, i32)> {
    let mut canvas = image::open(base_image)
        .with_context(|| format!("Failed to open compass image {}", base_image.display()))?
        .to_rgba8();

    let pixel = bounds.to_pixel(centroid);
    let (width, height) = canvas.dimensions();
    if pixel.0 < 0 || pixel.1 < 0 || pixel.0 >= width as i32 || pixel.1 >= height as i32 {
        warn!(
            "Marker at ({}, {}) falls outside the {}x{} image; check the pixel bounds",
            pixel.0, pixel.1, width, height
        );
    }

    draw_marker(&mut canvas, centroid, pixel, style, font);

    let marked = match ImageFormat::from_path(output_path) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()),
        _ => DynamicImage::ImageRgba8(canvas),
    };
    marked
        .save(output_path)
        .with_context(|| format!("Failed to save image to {}", output_path.display()))?;
    info!("Wrote {}", output_path.display());
    Ok(pixel)
}
