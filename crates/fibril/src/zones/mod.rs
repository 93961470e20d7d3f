//! Automatic SZ/MZ/DZ zone detection.

mod classifier;
mod config;
mod kmeans;
mod roles;
mod rows;

pub use classifier::{ClusterCenter, ZoneClassifier, ZoneDetection, ZoneHues};
pub use config::{ClassifierConfig, KMeansConfig};
pub use roles::{Zone, ZoneBoundaries};
pub use rows::RowLabel;
