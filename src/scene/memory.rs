//! In-memory scene implementing [`SceneHost`].
//!
//! Scenes can be built in code or loaded from JSON. Matrices in JSON are 16
//! numbers, row by row. Evaluated poses are keyed by frame; evaluation holds
//! the nearest earlier pose and falls back to the object's world matrix.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::anim::AnimationData;
use crate::core::{MeshExportOptions, ObjectKind, SceneHost, SceneTiming};
use crate::util::{point_to_y_up, DMat4, DVec3, Error, Frame, Result};

/// Polygon mesh of an object: positions and 0-based polygon indices.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<[f64; 3]>,
    pub faces: Vec<Vec<usize>>,
}

/// An object of a [`MemoryScene`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryObject {
    pub name: String,
    #[serde(default)]
    pub kind: ObjectKind,
    #[serde(default = "identity", with = "row_major")]
    pub matrix_world: DMat4,
    #[serde(default)]
    pub mesh: Option<MeshData>,
    #[serde(default)]
    pub animation: Option<AnimationData>,
    /// Evaluated world matrices by frame.
    #[serde(default, with = "pose_map")]
    pub poses: BTreeMap<Frame, DMat4>,
    #[serde(default)]
    pub selected: bool,
}

impl MemoryObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            matrix_world: DMat4::IDENTITY,
            mesh: None,
            animation: None,
            poses: BTreeMap::new(),
            selected: false,
        }
    }

    fn evaluate(&self, frame: Frame) -> DMat4 {
        self.poses
            .range(..=frame)
            .next_back()
            .map(|(_, m)| *m)
            .unwrap_or(self.matrix_world)
    }
}

fn identity() -> DMat4 {
    DMat4::IDENTITY
}

fn default_frame() -> Frame {
    1
}

/// A scene held entirely in memory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryScene {
    #[serde(default)]
    pub timing: SceneTiming,
    #[serde(default = "default_frame")]
    pub current_frame: Frame,
    /// Collection name to member object names, in member order.
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub objects: Vec<MemoryObject>,
}

impl MemoryScene {
    pub fn new(timing: SceneTiming) -> Self {
        Self {
            timing,
            current_frame: timing.frame_start,
            collections: BTreeMap::new(),
            objects: Vec::new(),
        }
    }

    /// Parse a scene from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let scene: Self = serde_json::from_str(text)?;
        scene.timing.validate()?;
        Ok(scene)
    }

    /// Load a scene from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add_object(&mut self, object: MemoryObject) {
        self.objects.push(object);
    }

    /// Add an object name to a collection, creating the collection if needed.
    pub fn link(&mut self, collection: &str, object: &str) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(object.to_string());
    }

    pub fn object(&self, name: &str) -> Result<&MemoryObject> {
        self.objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }

    pub fn object_mut(&mut self, name: &str) -> Result<&mut MemoryObject> {
        self.objects
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }

    /// Render objects to OBJ text, Y-up.
    ///
    /// There are no modifiers or materials in a memory scene, so only
    /// `export_selected_objects` and `apply_transform` change the output.
    pub fn obj_text(&self, options: &MeshExportOptions) -> String {
        let mut out = String::from("# anim-export memory scene\n");
        let mut offset = 1;
        let objects = self
            .objects
            .iter()
            .filter(|o| !options.export_selected_objects || o.selected);

        for obj in objects {
            let Some(mesh) = &obj.mesh else { continue };
            out.push_str(&format!("o {}\n", obj.name));
            for p in &mesh.positions {
                let mut v = DVec3::from_array(*p);
                if options.apply_transform {
                    v = obj.matrix_world.transform_point3(v);
                }
                let v = point_to_y_up(v);
                out.push_str(&format!("v {:.6} {:.6} {:.6}\n", v.x, v.y, v.z));
            }
            out.push_str("s 0\n");
            for face in &mesh.faces {
                let indices: Vec<String> = face.iter().map(|i| (i + offset).to_string()).collect();
                out.push_str(&format!("f {}\n", indices.join(" ")));
            }
            offset += mesh.positions.len();
        }
        out
    }
}

impl SceneHost for MemoryScene {
    fn timing(&self) -> SceneTiming {
        self.timing
    }

    fn collection_objects(&self, collection: &str) -> Option<Vec<String>> {
        self.collections.get(collection).cloned()
    }

    fn enumerate_objects(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.name.clone()).collect()
    }

    fn object_kind(&self, name: &str) -> Result<ObjectKind> {
        Ok(self.object(name)?.kind)
    }

    fn animation_data(&self, name: &str) -> Result<Option<AnimationData>> {
        Ok(self.object(name)?.animation.clone())
    }

    fn set_action_slot(&mut self, name: &str, slot: usize) -> Result<()> {
        let obj = self.object_mut(name)?;
        match obj.animation.as_mut() {
            Some(data) => {
                data.action_slot = Some(slot);
                Ok(())
            }
            None => Err(Error::other(format!("'{}' has no animation data", name))),
        }
    }

    fn select(&mut self, name: &str, selected: bool) -> Result<()> {
        self.object_mut(name)?.selected = selected;
        Ok(())
    }

    fn is_selected(&self, name: &str) -> Result<bool> {
        Ok(self.object(name)?.selected)
    }

    fn world_matrix(&self, name: &str) -> Result<DMat4> {
        Ok(self.object(name)?.matrix_world)
    }

    fn set_world_matrix(&mut self, name: &str, matrix: DMat4) -> Result<()> {
        self.object_mut(name)?.matrix_world = matrix;
        Ok(())
    }

    fn current_frame(&self) -> Frame {
        self.current_frame
    }

    fn set_current_frame(&mut self, frame: Frame) -> Result<()> {
        self.current_frame = frame;
        Ok(())
    }

    fn evaluate_world_transform(&mut self, name: &str, frame: Frame) -> Result<DMat4> {
        let m = self.object(name)?.evaluate(frame);
        trace!(object = name, frame, "evaluated");
        Ok(m)
    }

    fn export_selected_mesh(&mut self, path: &Path, options: &MeshExportOptions) -> Result<()> {
        fs::write(path, self.obj_text(options)).map_err(|e| Error::MeshExport {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

mod row_major {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::util::{from_row_major, to_row_major, DMat4};

    pub fn serialize<S: Serializer>(m: &DMat4, s: S) -> Result<S::Ok, S::Error> {
        to_row_major(m).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DMat4, D::Error> {
        let v = <[f64; 16]>::deserialize(d)?;
        Ok(from_row_major(&v))
    }
}

mod pose_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::util::{DMat4, Frame};

    #[derive(Serialize, Deserialize)]
    struct PoseKey {
        frame: Frame,
        #[serde(with = "super::row_major")]
        matrix: DMat4,
    }

    pub fn serialize<S: Serializer>(map: &BTreeMap<Frame, DMat4>, s: S) -> Result<S::Ok, S::Error> {
        map.iter()
            .map(|(frame, matrix)| PoseKey {
                frame: *frame,
                matrix: *matrix,
            })
            .collect::<Vec<_>>()
            .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<Frame, DMat4>, D::Error> {
        let keys = Vec::<PoseKey>::deserialize(d)?;
        Ok(keys.into_iter().map(|k| (k.frame, k.matrix)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "timing": { "frame_start": 1, "fps": 24.0 },
        "collections": { "EXPORT": ["Cube"] },
        "objects": [
            {
                "name": "Cube",
                "matrix_world": [1,0,0,5, 0,1,0,0, 0,0,1,0, 0,0,0,1],
                "mesh": { "positions": [[0,0,0],[1,0,0],[0,1,0]], "faces": [[0,1,2]] },
                "poses": [ { "frame": 10, "matrix": [1,0,0,2, 0,1,0,0, 0,0,1,0, 0,0,0,1] } ]
            },
            { "name": "Camera", "kind": "CAMERA" }
        ]
    }"#;

    #[test]
    fn test_load_json() {
        let scene = MemoryScene::from_json(SCENE).unwrap();
        assert_eq!(scene.current_frame, 1);
        assert_eq!(scene.collection_objects("EXPORT"), Some(vec!["Cube".to_string()]));
        assert_eq!(scene.collection_objects("OTHER"), None);
        assert_eq!(scene.object_kind("Camera").unwrap(), ObjectKind::Camera);

        let m = scene.world_matrix("Cube").unwrap();
        assert_eq!(m.w_axis.truncate(), DVec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_json_roundtrip_keeps_poses() {
        let scene = MemoryScene::from_json(SCENE).unwrap();
        let again = MemoryScene::from_json(&scene.to_json().unwrap()).unwrap();
        assert_eq!(scene, again);
    }

    #[test]
    fn test_evaluate_holds_previous_pose() {
        let mut scene = MemoryScene::from_json(SCENE).unwrap();
        let before = scene.evaluate_world_transform("Cube", 5).unwrap();
        assert_eq!(before.w_axis.x, 5.0);
        let at = scene.evaluate_world_transform("Cube", 10).unwrap();
        assert_eq!(at.w_axis.x, 2.0);
        let after = scene.evaluate_world_transform("Cube", 99).unwrap();
        assert_eq!(after.w_axis.x, 2.0);
    }

    #[test]
    fn test_unknown_object() {
        let mut scene = MemoryScene::from_json(SCENE).unwrap();
        assert!(matches!(scene.select("Nope", true), Err(Error::ObjectNotFound(_))));
        assert!(scene.evaluate_world_transform("Nope", 1).is_err());
    }

    #[test]
    fn test_obj_text_selected_only() {
        let mut scene = MemoryScene::from_json(SCENE).unwrap();
        let opts = MeshExportOptions::default();
        assert!(!scene.obj_text(&opts).contains("o Cube"));

        scene.select("Cube", true).unwrap();
        let text = scene.obj_text(&opts);
        assert!(text.contains("o Cube\n"));
        // (0,1,0) Z-up becomes (0,0,-1) Y-up
        assert!(text.contains("v 0.000000 0.000000 -1.000000\n"));
        assert!(text.contains("f 1 2 3\n"));
    }

    #[test]
    fn test_obj_text_apply_transform() {
        let mut scene = MemoryScene::from_json(SCENE).unwrap();
        scene.select("Cube", true).unwrap();
        let opts = MeshExportOptions {
            apply_transform: true,
            ..MeshExportOptions::default()
        };
        assert!(scene.obj_text(&opts).contains("v 5.000000 0.000000 0.000000\n"));
    }

    #[test]
    fn test_invalid_timing_rejected() {
        let text = r#"{ "timing": { "frame_start": 1, "fps": 0.0 } }"#;
        assert!(matches!(MemoryScene::from_json(text), Err(Error::InvalidConfig(_))));
    }
}
