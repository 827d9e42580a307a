//! Image output
//!
//! Plain-text PPM for the default path, anything the image crate can
//! encode otherwise. Input pixels are linear radiance in [0, 1]-ish;
//! gamma correction and byte quantization happen here.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

use crate::Color;

const GAMMA: f64 = 2.2;

/// Gamma-correct and quantize one channel.
fn to_byte(value: f64) -> u8 {
    (255.0 * value.clamp(0.0, 1.0).powf(1.0 / GAMMA) + 0.5) as u8
}

pub fn get_pixel(color: &Color) -> Rgb<u8> {
    Rgb([to_byte(color[0]), to_byte(color[1]), to_byte(color[2])])
}

/// Write a row-major buffer as a plain-text PPM file.
pub fn write_ppm(path: &Path, width: usize, height: usize, pixels: &[Color]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "P3")?;
    writeln!(out, "{width} {height}")?;
    writeln!(out, "255")?;
    for color in pixels {
        let Rgb([r, g, b]) = get_pixel(color);
        writeln!(out, "{r} {g} {b}")?;
    }
    out.flush()?;
    Ok(())
}

/// Encode a row-major buffer through the image crate; the format follows
/// the output extension.
pub fn write_image(path: &Path, width: usize, height: usize, pixels: &[Color]) -> Result<()> {
    let mut img = RgbImage::new(width as u32, height as u32);
    for (i, color) in pixels.iter().enumerate() {
        let x = (i % width) as u32;
        let y = (i / width) as u32;
        img.put_pixel(x, y, get_pixel(color));
    }
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))
}

/// Save the buffer, picking the encoder from the output extension.
pub fn save(path: &Path, width: usize, height: usize, pixels: &[Color]) -> Result<()> {
    match path.extension().and_then(OsStr::to_str) {
        Some("ppm") | None => write_ppm(path, width, height, pixels),
        _ => write_image(path, width, height, pixels),
    }
}
