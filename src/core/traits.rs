//! The host interface consumed by the exporters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::anim::AnimationData;
use crate::core::SceneTiming;
use crate::util::{DMat4, Frame, Result};

/// Kind of a scene object, as far as exporting cares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectKind {
    #[default]
    Mesh,
    Camera,
    Light,
    Empty,
}

impl ObjectKind {
    /// Cameras get no mesh and a forward-axis correction on their rotation.
    #[inline]
    pub fn is_camera(self) -> bool {
        matches!(self, Self::Camera)
    }
}

/// Flags handed to the host's OBJ writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshExportOptions {
    /// Export the post-modifier mesh.
    pub apply_modifiers: bool,
    /// Only write currently selected objects.
    pub export_selected_objects: bool,
    /// Write a material library alongside the mesh.
    pub export_materials: bool,
    /// Bake the world transform into vertex positions.
    pub apply_transform: bool,
}

impl Default for MeshExportOptions {
    fn default() -> Self {
        Self {
            apply_modifiers: true,
            export_selected_objects: true,
            export_materials: false,
            apply_transform: false,
        }
    }
}

/// Capabilities the exporter needs from a 3D host application.
///
/// Objects are addressed by name. Evaluation takes an explicit frame; a host
/// that can only evaluate at its current frame is free to move its cursor
/// inside [`SceneHost::evaluate_world_transform`].
pub trait SceneHost {
    /// Frame start and frame rate of the scene.
    fn timing(&self) -> SceneTiming;

    /// Names of the objects in a collection, in collection order.
    /// `None` if the collection does not exist.
    fn collection_objects(&self, collection: &str) -> Option<Vec<String>>;

    /// Names of every object in the scene.
    fn enumerate_objects(&self) -> Vec<String>;

    fn object_kind(&self, name: &str) -> Result<ObjectKind>;

    /// Animation data of an object, if it has any.
    fn animation_data(&self, name: &str) -> Result<Option<AnimationData>>;

    /// Store the slot chosen for an object's active action.
    fn set_action_slot(&mut self, name: &str, slot: usize) -> Result<()>;

    fn select(&mut self, name: &str, selected: bool) -> Result<()>;

    fn is_selected(&self, name: &str) -> Result<bool>;

    /// Unevaluated world matrix of an object.
    fn world_matrix(&self, name: &str) -> Result<DMat4>;

    fn set_world_matrix(&mut self, name: &str, matrix: DMat4) -> Result<()>;

    fn current_frame(&self) -> Frame;

    fn set_current_frame(&mut self, frame: Frame) -> Result<()>;

    /// Fully evaluated (post-modifier, post-constraint) world transform at `frame`.
    fn evaluate_world_transform(&mut self, name: &str, frame: Frame) -> Result<DMat4>;

    /// Write the selected objects to an OBJ file at `path`.
    fn export_selected_mesh(&mut self, path: &Path, options: &MeshExportOptions) -> Result<()>;
}
