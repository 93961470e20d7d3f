//! Flat tabular views of an analysis and CSV writers.

use std::io;

use serde::Serialize;

use crate::pipeline::AnalysisResult;
use crate::zones::{Zone, ZoneBoundaries};

/// One depth bin joined with the zone it falls in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    pub thickness: f64,
    pub angle: f64,
    pub std: f64,
    pub zone: Zone,
    pub hue: f64,
    pub rgb: [u8; 3],
    pub hex: String,
    pub intensity: u8,
}

/// Zone label of a normalized depth. A depth equal to a boundary belongs
/// to the shallower zone.
pub fn zone_for_thickness(boundaries: &ZoneBoundaries, thickness: f64) -> Zone {
    if thickness <= boundaries.sz_boundary {
        Zone::Superficial
    } else if thickness <= boundaries.mz_boundary {
        Zone::Middle
    } else {
        Zone::Deep
    }
}

/// Depth profile rows labelled with the result's zone boundaries.
pub fn profile_rows(result: &AnalysisResult) -> Vec<ProfileRow> {
    result
        .depth_profile
        .iter()
        .map(|bin| ProfileRow {
            thickness: bin.thickness,
            angle: bin.angle,
            std: bin.std,
            zone: zone_for_thickness(&result.zone_boundaries, bin.thickness),
            hue: bin.mean_hue,
            rgb: bin.mean_rgb,
            hex: bin.hex.clone(),
            intensity: bin.intensity,
        })
        .collect()
}

/// Write profile rows as CSV with a header line.
pub fn write_profile_csv<W: io::Write>(rows: &[ProfileRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "thickness", "angle", "std", "zone", "hue", "r", "g", "b", "hex", "intensity",
    ])?;
    for row in rows {
        let [r, g, b] = row.rgb;
        wtr.write_record([
            format!("{:.3}", row.thickness),
            format!("{:.4}", row.angle),
            format!("{:.4}", row.std),
            row.zone.to_string(),
            format!("{:.4}", row.hue),
            r.to_string(),
            g.to_string(),
            b.to_string(),
            row.hex.clone(),
            row.intensity.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one CSV line per zone with its boundaries and summary statistics.
pub fn write_zone_summary_csv<W: io::Write>(
    result: &AnalysisResult,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "zone",
        "start",
        "end",
        "mean_angle",
        "std_angle",
        "mean_hue",
        "hex",
        "mean_intensity",
        "pixel_count",
    ])?;
    let b = result.zone_boundaries;
    let spans = [
        (0.0, b.sz_boundary),
        (b.sz_boundary, b.mz_boundary),
        (b.mz_boundary, 1.0),
    ];
    for (zone, (start, end)) in Zone::ALL.into_iter().zip(spans) {
        let s = result.zone_summaries.get(zone);
        wtr.write_record([
            zone.to_string(),
            format!("{:.4}", start),
            format!("{:.4}", end),
            format!("{:.4}", s.mean_angle),
            format!("{:.4}", s.std_angle),
            format!("{:.4}", s.mean_hue),
            s.hex.clone(),
            format!("{:.2}", s.mean_intensity),
            s.pixel_count.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
