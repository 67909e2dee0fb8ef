use image::{
    imageops::{self, FilterType},
    Rgba, RgbaImage,
};
use tracing::debug;

pub const EPD_WIDTH: u32 = 800;
pub const EPD_HEIGHT: u32 = 480;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Size and position of a source image scaled to fit inside a canvas.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
}

impl Placement {
    /// Scales `src_width`x`src_height` to touch the canvas on at least one
    /// axis while keeping the aspect ratio, then centers it.
    pub fn fit(src_width: u32, src_height: u32, target_width: u32, target_height: u32) -> Self {
        if src_width == 0 || src_height == 0 {
            return Self::default();
        }
        let target_ratio = target_width as f64 / target_height as f64;
        let source_ratio = src_width as f64 / src_height as f64;
        let (width, height) = if source_ratio > target_ratio {
            (
                target_width,
                (target_width as f64 / source_ratio).floor() as u32,
            )
        } else {
            (
                (target_height as f64 * source_ratio).floor() as u32,
                target_height,
            )
        };
        // float rounding must never push the footprint past the canvas
        let width = width.min(target_width);
        let height = height.min(target_height);
        Self {
            width,
            height,
            x_offset: (target_width - width) / 2,
            y_offset: (target_height - height) / 2,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Resizes `src` into a white `target_width`x`target_height` canvas, centered
/// and aspect preserving. Pixels of the resized image overwrite the canvas,
/// alpha included.
pub fn letterbox(src: &RgbaImage, target_width: u32, target_height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(target_width, target_height, BACKGROUND);
    let placement = Placement::fit(src.width(), src.height(), target_width, target_height);
    debug!(
        "Placement {}x{} -> {}x{} at ({}, {})",
        src.width(),
        src.height(),
        placement.width,
        placement.height,
        placement.x_offset,
        placement.y_offset
    );
    if placement.is_empty() {
        return canvas;
    }

    let resized = imageops::resize(src, placement.width, placement.height, FilterType::Triangle);
    imageops::replace(
        &mut canvas,
        &resized,
        placement.x_offset as i64,
        placement.y_offset as i64,
    );
    canvas
}
