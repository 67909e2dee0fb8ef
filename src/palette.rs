use crate::error::ConvertError;
use image::{imageops::ColorMap, Rgb, Rgba};

/// Display color codes of the 7-color e-paper panel.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Black = 0,
    White = 1,
    Green = 2,
    Blue = 3,
    Red = 4,
    Yellow = 5,
    Orange = 6,
}

/// Palette in scan order. Matching ties resolve to the earlier entry, so the
/// order is part of the output contract.
pub const PALETTE: [PaletteColor; 7] = [
    PaletteColor::Black,
    PaletteColor::White,
    PaletteColor::Green,
    PaletteColor::Blue,
    PaletteColor::Red,
    PaletteColor::Yellow,
    PaletteColor::Orange,
];

impl PaletteColor {
    #[inline(always)]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn rgb(self) -> Rgb<u8> {
        Rgb(match self {
            PaletteColor::Black => [0, 0, 0],
            PaletteColor::White => [255, 255, 255],
            PaletteColor::Green => [0, 255, 0],
            PaletteColor::Blue => [0, 0, 255],
            PaletteColor::Red => [255, 0, 0],
            PaletteColor::Yellow => [255, 255, 0],
            PaletteColor::Orange => [255, 165, 0],
        })
    }

    #[inline]
    pub fn rgba(self) -> Rgba<u8> {
        let Rgb([r, g, b]) = self.rgb();
        Rgba([r, g, b, 255])
    }
}

impl TryFrom<u8> for PaletteColor {
    type Error = ConvertError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PALETTE
            .get(code as usize)
            .copied()
            .ok_or(ConvertError::InvalidPaletteCode(code))
    }
}

#[inline(always)]
fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.into_iter()
        .zip(b)
        .map(|(a, b)| {
            let d = a as i32 - b as i32;
            (d * d) as u32
        })
        .sum()
}

/// Nearest palette entry by Euclidean distance in RGB space.
///
/// Squared distances are compared, which keeps both the minimum and the ties
/// of the square-rooted metric. Only a strictly smaller distance replaces the
/// current best, so equidistant inputs resolve to the entry listed first in
/// [`PALETTE`].
pub fn nearest_palette_color(r: u8, g: u8, b: u8) -> PaletteColor {
    let mut best = PALETTE[0];
    let mut best_distance = u32::MAX;
    for color in PALETTE {
        let distance = distance_sq([r, g, b], color.rgb().0);
        if distance < best_distance {
            best_distance = distance;
            best = color;
        }
    }
    best
}

/// Inverse lookup from a raw palette code to its display RGB triple.
pub fn palette_color_to_rgb(code: u8) -> Result<Rgb<u8>, ConvertError> {
    PaletteColor::try_from(code).map(PaletteColor::rgb)
}

/// Fixed 7-color palette exposed through the `image` color map interface.
#[derive(Debug, Default, Clone, Copy)]
pub struct EpdColorMap;

impl ColorMap for EpdColorMap {
    type Color = Rgba<u8>;

    #[inline(always)]
    fn index_of(&self, color: &Self::Color) -> usize {
        let [r, g, b, _] = color.0;
        nearest_palette_color(r, g, b).code() as usize
    }

    fn lookup(&self, index: usize) -> Option<Self::Color> {
        PALETTE.get(index).map(|color| color.rgba())
    }

    fn has_lookup(&self) -> bool {
        true
    }

    #[inline(always)]
    fn map_color(&self, color: &mut Self::Color) {
        let [r, g, b, _] = color.0;
        *color = nearest_palette_color(r, g, b).rgba();
    }
}
