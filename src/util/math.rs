//! Math type re-exports and exporter-specific math utilities.
//!
//! All transforms are carried in double precision so that the text output
//! keeps every digit the host hands us.

pub use glam::{DMat3, DMat4, DQuat, DVec3, DVec4};

/// Frame index on the host timeline.
pub type Frame = i64;

/// Time value in seconds.
pub type Chrono = f64;

/// Z-up to Y-up change of basis: `x' = x`, `y' = z`, `z' = -y`.
///
/// Row-major this reads `((1,0,0,0), (0,0,1,0), (0,-1,0,0), (0,0,0,1))`.
pub const Y_UP_BASIS: DMat4 = DMat4::from_cols(
    DVec4::new(1.0, 0.0, 0.0, 0.0),
    DVec4::new(0.0, 0.0, -1.0, 0.0),
    DVec4::new(0.0, 1.0, 0.0, 0.0),
    DVec4::new(0.0, 0.0, 0.0, 1.0),
);

/// Re-express a Z-up world matrix in the Y-up convention: `Ry * m * Ry⁻¹`.
#[inline]
pub fn to_y_up(m: DMat4) -> DMat4 {
    // Ry is orthonormal, its transpose is its exact inverse
    Y_UP_BASIS * m * Y_UP_BASIS.transpose()
}

/// Map a Z-up point to Y-up.
#[inline]
pub fn point_to_y_up(p: DVec3) -> DVec3 {
    Y_UP_BASIS.transform_point3(p)
}

/// Flatten a matrix into 16 values, row by row.
pub fn to_row_major(m: &DMat4) -> [f64; 16] {
    // glam stores columns; the transpose's column array is the row-major order
    m.transpose().to_cols_array()
}

/// Build a matrix from 16 values given row by row.
pub fn from_row_major(v: &[f64; 16]) -> DMat4 {
    DMat4::from_cols_array(v).transpose()
}

/// Format a float as its shortest round-trip text, always with a fractional
/// part or exponent (`1.0`, `0.25`, `1e-7`).
#[inline]
pub fn fmt_float(v: f64) -> String {
    format!("{:?}", v)
}
