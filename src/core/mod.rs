//! Host abstraction and scene timing.
//!
//! The exporter never talks to a 3D application directly. Everything it needs
//! from the host goes through [`SceneHost`].

mod time_sampling;
mod traits;

pub use time_sampling::*;
pub use traits::*;
