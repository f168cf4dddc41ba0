//! The `.animation` track text format.
//!
//! One record per line, twelve comma-separated fields:
//!
//! ```text
//! time,interpolation,pos.x,pos.y,pos.z,rot.x,rot.y,rot.z,rot.w,scale.x,scale.y,scale.z
//! ```
//!
//! Floats use their shortest round-trip representation. Axes are written in
//! the host's Z-up convention; the reader on the renderer side swaps them.

use std::fs;
use std::path::Path;

use super::{Interpolation, SampledPose};
use crate::util::{fmt_float, DQuat, DVec3, Error, Result};

/// File extension of track files.
pub const ANIMATION_EXTENSION: &str = "animation";

/// Number of fields in a record.
pub const FIELD_COUNT: usize = 12;

/// Format a single record, without the trailing newline.
pub fn format_record(pose: &SampledPose) -> String {
    let p = pose.position;
    let r = pose.rotation;
    let s = pose.scale;
    let fields = [
        fmt_float(pose.time),
        pose.interpolation.to_string(),
        fmt_float(p.x),
        fmt_float(p.y),
        fmt_float(p.z),
        fmt_float(r.x),
        fmt_float(r.y),
        fmt_float(r.z),
        fmt_float(r.w),
        fmt_float(s.x),
        fmt_float(s.y),
        fmt_float(s.z),
    ];
    fields.join(",")
}

/// Serialize a whole track; every record ends with `\n`.
pub fn format_track(poses: &[SampledPose]) -> String {
    let mut out = String::new();
    for pose in poses {
        out.push_str(&format_record(pose));
        out.push('\n');
    }
    out
}

/// Write a track to `path`, replacing any existing file.
///
/// An empty track writes nothing and leaves an existing file alone; returns
/// whether a file was written.
pub fn write_track(path: &Path, poses: &[SampledPose]) -> Result<bool> {
    if poses.is_empty() {
        return Ok(false);
    }
    fs::write(path, format_track(poses))?;
    Ok(true)
}

/// Parse one record. `line` is the 1-based line number used in errors.
pub fn parse_record(text: &str, line: usize) -> Result<SampledPose> {
    let fields: Vec<&str> = text.trim_end_matches('\r').split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(Error::parse(
            line,
            format!("expected {} fields, got {}", FIELD_COUNT, fields.len()),
        ));
    }

    let num = |i: usize| -> Result<f64> {
        fields[i]
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::parse(line, format!("field {} '{}': {}", i + 1, fields[i], e)))
    };

    let interpolation = fields[1]
        .trim()
        .parse::<Interpolation>()
        .map_err(|e| Error::parse(line, e.to_string()))?;

    Ok(SampledPose {
        time: num(0)?,
        interpolation,
        position: DVec3::new(num(2)?, num(3)?, num(4)?),
        rotation: DQuat::from_xyzw(num(5)?, num(6)?, num(7)?, num(8)?),
        scale: DVec3::new(num(9)?, num(10)?, num(11)?),
    })
}

/// Parse a whole track. Blank lines are skipped.
pub fn parse_track(text: &str) -> Result<Vec<SampledPose>> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| parse_record(l, i + 1))
        .collect()
}

/// Read and parse a track file.
pub fn read_track(path: &Path) -> Result<Vec<SampledPose>> {
    let text = fs::read_to_string(path)?;
    parse_track(&text)
}
