//! Analysis pipeline.
//!
//! Wires the components together for one image: optional zone detection,
//! anchor resolution, zone summaries, depth profile and hue histogram.
//! Algorithmic pieces live in `crate::zones`, `crate::calibration`,
//! `crate::summary` and `crate::profile`.

mod params;
mod result;
mod run;

pub use params::AnalysisParams;
pub use result::{AnalysisResult, DetectionReport};

pub(crate) use run::analyze;
