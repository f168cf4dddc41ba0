//! Utility types and functions.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and the Z-up to Y-up basis change

mod error;
mod math;

pub use error::*;
pub use math::*;
