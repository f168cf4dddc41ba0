//! Scene hosts shipped with the crate.

mod memory;

pub use memory::*;
