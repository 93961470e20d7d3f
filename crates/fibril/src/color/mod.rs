//! Color-space extraction.
//!
//! Converts decoded RGB buffers into 8-bit hue/saturation/value planes
//! (hue in half-degrees, `[0, 180)`) and exposes row-range regions and
//! per-component validity masks over them.

mod hsv;
mod mask;

pub use hsv::{hsv_to_rgb, rgb_to_hsv, Hsv, HsvImage, Region, HUE_RANGE};
pub use mask::PixelMask;
