//! Export configuration and the per-collection driver.

mod config;
mod pipeline;

pub use config::*;
pub use pipeline::*;
