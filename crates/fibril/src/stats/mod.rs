//! Numeric helpers shared by the profiler, the aggregator and the classifier.

mod circular;
mod descriptive;

pub use circular::{circular_mean_hue, HueAnchors};
pub use descriptive::{hex_color, mean, median, std_dev, ColorAccumulator};
