//! # anim-export
//!
//! Exports scene objects from a 3D host into the text formats read by a
//! keyframed renderer:
//!
//! - `<name>.obj` - the host's OBJ output plus a trailing
//!   `TRANSFORM <16 floats>` line with the object's Y-up world matrix
//! - `<name>.animation` - one pose record per keyed frame of the object's
//!   active action
//!
//! ## Modules
//!
//! - [`util`] - Errors and math helpers
//! - [`core`] - The [`SceneHost`](core::SceneHost) trait and scene timing
//! - [`anim`] - Keyframe aggregation, transform sampling, track format
//! - [`mesh`] - OBJ export and the `TRANSFORM` line
//! - [`scene`] - An in-memory, JSON-loadable host
//! - [`export`] - Configuration and the per-collection driver
//!
//! ## Example
//!
//! ```ignore
//! use anim_export::prelude::*;
//!
//! let mut scene = MemoryScene::load("scene.json".as_ref())?;
//! let config = ExportConfig::default();
//! let stats = Exporter::new(&config, "blend_dir".as_ref()).export_collection(&mut scene)?;
//! println!("{} files written", stats.files());
//! ```

pub mod util;
pub mod core;
pub mod anim;
pub mod mesh;
pub mod scene;
pub mod export;

pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, DMat4, DQuat, DVec3, Frame};
    pub use crate::core::{MeshExportOptions, ObjectKind, SceneHost, SceneTiming};
    pub use crate::anim::{
        Action, AnimationData, AnimationExporter, Channel, ContinuityStage, Interpolation,
        KeyframeTable, SampledPose, TrackOptions,
    };
    pub use crate::mesh::MeshExporter;
    pub use crate::scene::{MemoryObject, MemoryScene, MeshData};
    pub use crate::export::{ExportConfig, ExportStats, Exporter};
}
