//! Visual inspection images: zone boundary overlay, validity mask and hue heatmap.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::color::{rgb_to_hsv, PixelMask};
use crate::zones::{Zone, ZoneBoundaries};

/// Boundary line color.
pub const BOUNDARY_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
/// Boundary line thickness in pixels.
pub const BOUNDARY_THICKNESS: u32 = 2;
/// Zone label color.
pub const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const LABEL_X: i32 = 10;
const LABEL_SCALE: i32 = 2;
const GLYPH_W: i32 = 5;
const GLYPH_H: i32 = 7;

/// Copy of `image` with a horizontal line at each zone boundary and an
/// `SZ`/`MZ`/`DZ` label inside each zone.
pub fn annotate_zones(image: &RgbImage, boundaries: &ZoneBoundaries) -> RgbImage {
    let mut out = image.clone();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return out;
    }
    let rows = boundaries.rows(height);
    for row in rows {
        let top = row.min(height - 1).saturating_sub(BOUNDARY_THICKNESS / 2);
        let rect = Rect::at(0, top as i32).of_size(width, BOUNDARY_THICKNESS);
        draw_filled_rect_mut(&mut out, rect, BOUNDARY_COLOR);
    }

    let [sz, mz] = rows.map(|r| r as i32);
    let h = height as i32;
    let baselines = [(sz - 10).min(30), (mz - 10).min(sz + 30), (h - 10).min(mz + 30)];
    for (zone, baseline) in Zone::ALL.into_iter().zip(baselines) {
        draw_label(&mut out, zone.abbrev(), LABEL_X, baseline);
    }
    out
}

/// Copy of `image` with pixels outside the zone-summary mask set to black.
pub fn masked_image(image: &RgbImage) -> RgbImage {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        let [r, g, b] = px.0;
        if !PixelMask::ZONE_SUMMARY.accepts(rgb_to_hsv(r, g, b)) {
            *px = Rgb([0, 0, 0]);
        }
    }
    out
}

/// Hue plane stretched to the full `0..=255` range and rendered with a jet
/// colormap. A constant hue plane maps to the low end of the colormap.
pub fn hue_heatmap(image: &RgbImage) -> RgbImage {
    let hue = |px: &Rgb<u8>| rgb_to_hsv(px.0[0], px.0[1], px.0[2]).h;
    let (lo, hi) = image
        .pixels()
        .map(hue)
        .fold((u8::MAX, u8::MIN), |(lo, hi), h| (lo.min(h), hi.max(h)));
    let span = hi.saturating_sub(lo) as f64;
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let level = if span > 0.0 {
            ((hue(image.get_pixel(x, y)) - lo) as f64 * 255.0 / span).round()
        } else {
            0.0
        };
        jet(level / 255.0)
    })
}

/// Jet colormap: blue at 0, through cyan, green and yellow, to red at 1.
fn jet(t: f64) -> Rgb<u8> {
    let channel = |center: f64| {
        let c = (1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

/// 5x7 bitmap rows for the label characters, most significant bit leftmost.
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        _ => return None,
    };
    Some(rows)
}

/// Draw `text` with its bottom edge on `baseline`; parts outside the image are clipped.
fn draw_label(image: &mut RgbImage, text: &str, x: i32, baseline: i32) {
    let top = baseline - GLYPH_H * LABEL_SCALE;
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let left = x + i as i32 * (GLYPH_W + 1) * LABEL_SCALE;
        for (gy, &bits) in rows.iter().enumerate() {
            for gx in 0..GLYPH_W {
                if (bits >> (GLYPH_W - 1 - gx)) & 1 == 0 {
                    continue;
                }
                let rect = Rect::at(left + gx * LABEL_SCALE, top + gy as i32 * LABEL_SCALE)
                    .of_size(LABEL_SCALE as u32, LABEL_SCALE as u32);
                draw_filled_rect_mut(image, rect, LABEL_COLOR);
            }
        }
    }
}
