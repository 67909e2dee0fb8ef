use crate::error::ConvertError;
use crate::letterbox::{letterbox, EPD_HEIGHT, EPD_WIDTH};
use crate::palette::{nearest_palette_color, PaletteColor};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Letterboxed 800x480 canvas ready to be quantized to panel colors.
pub struct EpdEncoder {
    canvas: RgbaImage,
}

impl Default for EpdEncoder {
    /// Blank white panel.
    fn default() -> Self {
        Self {
            canvas: letterbox(&RgbaImage::new(0, 0), EPD_WIDTH, EPD_HEIGHT),
        }
    }
}

impl EpdEncoder {
    pub fn open<P: AsRef<Path>>(img_path: P) -> Result<Self, ConvertError> {
        let img = ImageReader::open(img_path.as_ref())
            .map_err(|e| ConvertError::Decode(ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| ConvertError::Decode(ImageError::IoError(e)))?
            .decode()
            .map_err(ConvertError::Decode)?;
        info!(
            "Opened {}: {}x{}",
            img_path.as_ref().display(),
            img.width(),
            img.height()
        );
        Ok(Self::from_image(&img))
    }

    pub fn from_image(img: &DynamicImage) -> Self {
        let canvas = letterbox(&img.to_rgba8(), EPD_WIDTH, EPD_HEIGHT);
        Self { canvas }
    }

    #[inline(always)]
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Palette codes of the canvas, row-major from the top-left corner.
    pub fn quantize(&self) -> Vec<u8> {
        let start_time = Instant::now();
        let codes: Vec<u8> = self
            .canvas
            .pixels()
            .map(|p| nearest_palette_color(p[0], p[1], p[2]).code())
            .collect();
        info!(
            "Quantized {} pixels, {}ms",
            codes.len(),
            start_time.elapsed().as_millis()
        );
        codes
    }
}

/// Renders palette codes back into an opaque RGBA image.
pub fn preview(codes: &[u8], width: u32, height: u32) -> Result<RgbaImage, ConvertError> {
    let expected = width as usize * height as usize;
    if codes.len() != expected {
        return Err(ConvertError::Dimensions {
            expected,
            actual: codes.len(),
        });
    }
    let mut img = RgbaImage::new(width, height);
    for (pixel, &code) in img.pixels_mut().zip(codes) {
        *pixel = PaletteColor::try_from(code)?.rgba();
    }
    Ok(img)
}

pub fn save_preview<P: AsRef<Path>>(img: &RgbaImage, path: P) -> Result<(), ConvertError> {
    img.save_with_format(path.as_ref(), ImageFormat::Png)
        .map_err(ConvertError::Encode)?;
    info!("Preview saved to {}", path.as_ref().display());
    Ok(())
}

/// Decodes `img_path`, fits it to the panel, writes the preview PNG and
/// returns the 800x480 palette codes.
pub fn convert_image<P, Q>(img_path: P, preview_path: Q) -> Result<Vec<u8>, ConvertError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let encoder = EpdEncoder::open(img_path)?;
    let codes = encoder.quantize();
    let img = preview(&codes, EPD_WIDTH, EPD_HEIGHT)?;
    save_preview(&img, preview_path)?;
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{palette_color_to_rgb, PALETTE};
    use image::{Rgb, Rgba};
    use std::path::PathBuf;

    const CANVAS_LEN: usize = (EPD_WIDTH * EPD_HEIGHT) as usize;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("epd7color-{}-{name}", std::process::id()))
    }

    fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn output_length_is_fixed() {
        for (w, h) in [(1, 1), (100, 100), (1600, 480), (3000, 2000), (10_000, 1)] {
            let codes = EpdEncoder::from_image(&solid(w, h, [0, 255, 0, 255])).quantize();
            assert_eq!(codes.len(), CANVAS_LEN, "{w}x{h}");
        }
    }

    #[test]
    fn default_encoder_is_blank_panel() {
        let encoder = EpdEncoder::default();
        assert_eq!(encoder.canvas().dimensions(), (EPD_WIDTH, EPD_HEIGHT));
        let codes = encoder.quantize();
        assert_eq!(codes.len(), CANVAS_LEN);
        assert!(codes.iter().all(|&c| c == PaletteColor::White.code()));
    }

    #[test]
    fn codes_stay_in_palette() {
        let img = RgbaImage::from_fn(97, 61, |x, y| {
            Rgba([(x * 5) as u8, (y * 7) as u8, ((x + y) * 3) as u8, 255])
        });
        let codes = EpdEncoder::from_image(&DynamicImage::ImageRgba8(img)).quantize();
        let palette: Vec<Rgb<u8>> = PALETTE.iter().map(|c| c.rgb()).collect();
        for code in codes {
            let rgb = palette_color_to_rgb(code).unwrap();
            assert!(palette.contains(&rgb));
        }
    }

    #[test]
    fn solid_red_square() {
        let codes = EpdEncoder::from_image(&solid(100, 100, [255, 0, 0, 255])).quantize();
        // 480x480 footprint at x = 160
        for (i, &code) in codes.iter().enumerate() {
            let x = i as u32 % EPD_WIDTH;
            if (160..640).contains(&x) {
                assert_eq!(code, PaletteColor::Red.code(), "pixel {i}");
            } else {
                assert_eq!(code, PaletteColor::White.code(), "pixel {i}");
            }
        }
    }

    #[test]
    fn preview_matches_codes() {
        let codes: Vec<u8> = (0..CANVAS_LEN).map(|i| (i % 7) as u8).collect();
        let img = preview(&codes, EPD_WIDTH, EPD_HEIGHT).unwrap();
        assert_eq!(img.dimensions(), (EPD_WIDTH, EPD_HEIGHT));
        for (pixel, &code) in img.pixels().zip(&codes) {
            let Rgb([r, g, b]) = palette_color_to_rgb(code).unwrap();
            assert_eq!(*pixel, Rgba([r, g, b, 255]));
        }
    }

    #[test]
    fn preview_rejects_bad_input() {
        let mut codes = vec![1u8; 4];
        codes[2] = 9;
        assert!(matches!(
            preview(&codes, 2, 2),
            Err(ConvertError::InvalidPaletteCode(9))
        ));
        assert!(matches!(
            preview(&codes, 3, 2),
            Err(ConvertError::Dimensions {
                expected: 6,
                actual: 4
            })
        ));
    }

    #[test]
    fn convert_writes_preview() {
        let input = temp_path("red.png");
        let output = temp_path("preview.png");
        solid(100, 100, [255, 0, 0, 255]).save(&input).unwrap();

        let codes = convert_image(&input, &output).unwrap();
        assert_eq!(codes.len(), CANVAS_LEN);

        let saved = image::open(&output).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (EPD_WIDTH, EPD_HEIGHT));
        assert_eq!(*saved.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*saved.get_pixel(400, 240), Rgba([255, 0, 0, 255]));

        let _ = std::fs::remove_file(input);
        let _ = std::fs::remove_file(output);
    }

    #[test]
    fn missing_input_is_decode_failure() {
        let output = temp_path("never-written.png");
        let result = convert_image(temp_path("does-not-exist.png"), &output);
        assert!(matches!(result, Err(ConvertError::Decode(_))));
        assert!(!output.exists());
    }

    #[test]
    fn garbage_input_is_decode_failure() {
        let input = temp_path("garbage.png");
        std::fs::write(&input, b"definitely not an image").unwrap();
        assert!(matches!(
            EpdEncoder::open(&input),
            Err(ConvertError::Decode(_))
        ));
        let _ = std::fs::remove_file(input);
    }

    #[test]
    fn unwritable_preview_is_encode_failure() {
        let input = temp_path("blue.png");
        solid(10, 10, [0, 0, 255, 255]).save(&input).unwrap();
        let output = temp_path("missing-dir").join("preview.png");
        assert!(matches!(
            convert_image(&input, output),
            Err(ConvertError::Encode(_))
        ));
        let _ = std::fs::remove_file(input);
    }
}
