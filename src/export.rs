//! Display buffer output for the 7.3" 7-color panel driver.
//!
//! The driver takes 4 bits per pixel, two pixels per byte, with the left
//! pixel in the high nibble.

use crate::error::ConvertError;
use crate::palette::PaletteColor;
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;
use tracing::info;

const BYTES_PER_LINE: usize = 16;

pub fn pack_nibbles(codes: &[u8]) -> Vec<u8> {
    codes
        .chunks(2)
        .map(|pair| {
            let hi = pair[0] & 0x0f;
            let lo = pair.get(1).copied().unwrap_or(PaletteColor::White.code()) & 0x0f;
            (hi << 4) | lo
        })
        .collect()
}

pub fn write_raw<W: Write>(bytes: &[u8], w: &mut W) -> Result<(), Error> {
    w.write_all(bytes)?;
    w.flush()
}

/// Emits `bytes` as a C array definition named `name`.
pub fn write_c_array<W: Write>(name: &str, bytes: &[u8], w: &mut W) -> Result<(), Error> {
    writeln!(w, "const unsigned char {}[{}] = {{", name, bytes.len())?;
    for line in bytes.chunks(BYTES_PER_LINE) {
        write!(w, "   ")?;
        line.iter().try_for_each(|b| write!(w, " 0x{:02X},", b))?;
        writeln!(w)?;
    }
    writeln!(w, "}};")?;
    w.flush()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum BufferFormat {
    /// Packed 4-bit pixels, two per byte
    #[default]
    Raw,
    /// C source array of the packed bytes
    CArray,
}

/// Packs `codes` and writes them to `path` in the requested format.
pub fn write_buffer<P: AsRef<Path>>(
    codes: &[u8],
    path: P,
    format: BufferFormat,
    name: &str,
) -> Result<(), ConvertError> {
    let packed = pack_nibbles(codes);
    let mut w = BufWriter::new(File::create(path.as_ref())?);
    match format {
        BufferFormat::Raw => write_raw(&packed, &mut w)?,
        BufferFormat::CArray => write_c_array(name, &packed, &mut w)?,
    }
    info!(
        "Display buffer ({} bytes) written to {}",
        packed.len(),
        path.as_ref().display()
    );
    Ok(())
}
