mod epd_encoder;
mod error;
pub mod export;
pub mod letterbox;
pub mod palette;

pub use epd_encoder::{convert_image, preview, save_preview, EpdEncoder};
pub use error::ConvertError;
pub use letterbox::{letterbox, Placement, EPD_HEIGHT, EPD_WIDTH};
pub use palette::{
    nearest_palette_color, palette_color_to_rgb, EpdColorMap, PaletteColor, PALETTE,
};
