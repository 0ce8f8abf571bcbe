//! PNG encoder
//!
//! Draws the pretty-printed JSON onto a fixed 800x600 white canvas with an
//! 8x8 bitmap font scaled to 16px. There is no wrapping or pagination: text
//! past the right or bottom edge is clipped.

use std::io::Cursor;

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;

use super::error::EncodeResult;
use super::pretty_text;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;
const ORIGIN_X: u32 = 50;
const ORIGIN_Y: u32 = 50;
const GLYPH_SCALE: u32 = 2;
const GLYPH_SIZE: u32 = 8 * GLYPH_SCALE;
const LINE_HEIGHT: u32 = 20;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FOREGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Encode any JSON value as a PNG image of its text
pub fn encode(value: &Value) -> EncodeResult<Vec<u8>> {
    let text = pretty_text(value);

    let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);
    for (row, line) in text.lines().enumerate() {
        let y = ORIGIN_Y + row as u32 * LINE_HEIGHT;
        if y >= CANVAS_HEIGHT {
            break;
        }
        draw_line(&mut canvas, ORIGIN_X, y, line);
    }

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(canvas).write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

fn draw_line(canvas: &mut RgbImage, x: u32, y: u32, line: &str) {
    for (column, c) in line.chars().enumerate() {
        let left = x + column as u32 * GLYPH_SIZE;
        if left >= CANVAS_WIDTH {
            break;
        }
        draw_glyph(canvas, left, y, glyph(c));
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_glyph(canvas: &mut RgbImage, left: u32, top: u32, rows: [u8; 8]) {
    for (gy, bits) in rows.iter().enumerate() {
        for gx in 0..8u32 {
            if bits & (1 << gx) == 0 {
                continue;
            }
            for dy in 0..GLYPH_SCALE {
                for dx in 0..GLYPH_SCALE {
                    let px = left + gx * GLYPH_SCALE + dx;
                    let py = top + gy as u32 * GLYPH_SCALE + dy;
                    if px < CANVAS_WIDTH && py < CANVAS_HEIGHT {
                        canvas.put_pixel(px, py, FOREGROUND);
                    }
                }
            }
        }
    }
}
