//! Integration tests for exporting collections from an in-memory scene.

use std::fs;
use std::path::Path;

use anim_export::anim::camera_correction;
use anim_export::anim::format::read_track;
use anim_export::mesh::obj::read_obj_transform;
use anim_export::prelude::*;

use tempfile::TempDir;

fn animated(name: &str, kind: ObjectKind, keys: &[(f64, Interpolation)]) -> MemoryObject {
    let mut ch = Channel::new("location", 0);
    for &(f, i) in keys {
        ch = ch.with_key(f, i);
    }
    let mut obj = MemoryObject::new(name, kind);
    obj.animation = Some(AnimationData::new(Action::with_channels(
        format!("{}Action", name),
        vec![ch],
    )));
    obj
}

fn triangle() -> MeshData {
    MeshData {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        faces: vec![vec![0, 1, 2]],
    }
}

/// Config writing straight into `<tmp>/ObjFiles` and `<tmp>/Animation`.
fn setup() -> (TempDir, Exporter) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = ExportConfig {
        project_dir: ".".into(),
        ..ExportConfig::default()
    };
    let exporter = Exporter::new(&config, temp.path());
    (temp, exporter)
}

fn scene() -> MemoryScene {
    let mut scene = MemoryScene::new(SceneTiming::new(1, 24.0).unwrap());

    let mut cube = animated(
        "Cube",
        ObjectKind::Mesh,
        &[(1.0, Interpolation::Linear), (25.0, Interpolation::Linear)],
    );
    cube.mesh = Some(triangle());
    cube.matrix_world = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0));
    cube.poses.insert(1, DMat4::from_translation(DVec3::new(0.0, 0.0, 0.0)));
    cube.poses.insert(25, DMat4::from_translation(DVec3::new(0.0, 0.0, 4.0)));
    scene.add_object(cube);

    let mut cam = animated("Camera", ObjectKind::Camera, &[(1.0, Interpolation::Bezier)]);
    cam.poses.insert(1, DMat4::from_quat(DQuat::from_rotation_z(0.25)));
    scene.add_object(cam);

    let mut ground = MemoryObject::new("Ground", ObjectKind::Mesh);
    ground.mesh = Some(triangle());
    scene.add_object(ground);

    // Not in the collection
    scene.add_object(MemoryObject::new("Helper", ObjectKind::Empty));

    for name in ["Cube", "Camera", "Ground"] {
        scene.link("EXPORT", name);
    }
    scene
}

#[test]
fn test_export_collection_files() {
    let (temp, exporter) = setup();
    let mut scene = scene();

    let stats = exporter.export_collection(&mut scene).expect("export failed");
    println!("{:?}", stats);

    assert_eq!(stats.meshes, 2, "cameras get no mesh");
    assert_eq!(stats.tracks, 2);
    assert_eq!(stats.skipped_tracks, 1);
    assert_eq!(stats.records, 3);

    let objs = temp.path().join("ObjFiles");
    let anims = temp.path().join("Animation");
    assert!(objs.join("Cube.obj").exists());
    assert!(objs.join("Ground.obj").exists());
    assert!(!objs.join("Camera.obj").exists());
    assert!(!objs.join("Helper.obj").exists());
    assert!(anims.join("Cube.animation").exists());
    assert!(anims.join("Camera.animation").exists());
    assert!(!anims.join("Ground.animation").exists());
}

#[test]
fn test_cube_track_contents() {
    let (temp, exporter) = setup();
    let mut scene = scene();
    exporter.export_collection(&mut scene).unwrap();

    let text = fs::read_to_string(temp.path().join("Animation/Cube.animation")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("0.0,LINEAR,0.0,0.0,0.0,"));
    assert!(lines[1].starts_with("1.0,LINEAR,0.0,0.0,4.0,"));
    assert!(lines[1].ends_with(",1.0,1.0,1.0"));
    assert!(text.ends_with('\n'));
}

#[test]
fn test_mesh_only_selected_object_with_transform() {
    let (temp, exporter) = setup();
    let mut scene = scene();
    exporter.export_collection(&mut scene).unwrap();

    let path = temp.path().join("ObjFiles/Cube.obj");
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("o Cube\n"));
    assert!(!text.contains("o Ground"));

    // Positions are untransformed; the world matrix lives in TRANSFORM
    assert!(text.contains("v 1.000000 0.000000 0.000000\n"));
    let m = read_obj_transform(&path).unwrap().expect("missing TRANSFORM");
    assert_eq!(m.w_axis.truncate(), DVec3::new(1.0, 3.0, -2.0));
}

#[test]
fn test_selection_and_matrix_restored() {
    let (_temp, exporter) = setup();
    let mut scene = scene();
    scene.select("Helper", true).unwrap();

    exporter.export_collection(&mut scene).unwrap();

    for name in scene.enumerate_objects() {
        assert!(!scene.is_selected(&name).unwrap(), "{} still selected", name);
    }
    assert_eq!(
        scene.world_matrix("Cube").unwrap(),
        DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0))
    );
}

#[test]
fn test_camera_track_corrected() {
    let (temp, exporter) = setup();
    let mut scene = scene();
    exporter.export_collection(&mut scene).unwrap();

    let poses = read_track(&temp.path().join("Animation/Camera.animation")).unwrap();
    assert_eq!(poses.len(), 1);
    assert_eq!(poses[0].interpolation, Interpolation::Bezier);

    let expected = DQuat::from_rotation_z(0.25) * camera_correction();
    assert!(poses[0].rotation.dot(expected).abs() > 1.0 - 1e-9);
}

#[test]
fn test_camera_correction_disabled() {
    let temp = TempDir::new().unwrap();
    let config = ExportConfig {
        project_dir: ".".into(),
        camera_correction: false,
        ..ExportConfig::default()
    };
    let mut scene = scene();
    Exporter::new(&config, temp.path())
        .export_collection(&mut scene)
        .unwrap();

    let poses = read_track(&temp.path().join("Animation/Camera.animation")).unwrap();
    assert!(poses[0].rotation.dot(DQuat::from_rotation_z(0.25)).abs() > 1.0 - 1e-9);
}

#[test]
fn test_missing_collection() {
    let (temp, _) = setup();
    let config = ExportConfig {
        project_dir: ".".into(),
        collection: "NOPE".into(),
        ..ExportConfig::default()
    };
    let mut scene = scene();
    let err = Exporter::new(&config, temp.path())
        .export_collection(&mut scene)
        .unwrap_err();
    assert!(matches!(err, Error::CollectionNotFound(ref c) if c == "NOPE"));
    assert_eq!(err.to_string(), "No 'NOPE' collection found");
    assert!(!temp.path().join("ObjFiles").exists());
}

#[test]
fn test_static_object_keeps_old_track() {
    let (temp, exporter) = setup();
    let anims = temp.path().join("Animation");
    fs::create_dir_all(&anims).unwrap();
    fs::write(anims.join("Ground.animation"), "stale\n").unwrap();

    let mut scene = scene();
    exporter.export_collection(&mut scene).unwrap();

    assert_eq!(fs::read_to_string(anims.join("Ground.animation")).unwrap(), "stale\n");
}

#[test]
fn test_duplicate_keyed_frames() {
    let (temp, exporter) = setup();
    let mut scene = MemoryScene::new(SceneTiming::default());

    let a = Channel::new("location", 0)
        .with_key(1.0, Interpolation::Linear)
        .with_key(5.0, Interpolation::Linear);
    let b = Channel::new("location", 2)
        .with_key(5.0, Interpolation::Bezier)
        .with_key(10.0, Interpolation::Constant);
    let mut obj = MemoryObject::new("Bob", ObjectKind::Empty);
    obj.animation = Some(AnimationData::new(Action::with_channels("act", vec![a, b])));
    scene.add_object(obj);
    scene.link("EXPORT", "Bob");

    exporter.export_collection(&mut scene).unwrap();

    let poses = read_track(&temp.path().join("Animation/Bob.animation")).unwrap();
    let times: Vec<f64> = poses.iter().map(|p| p.time).collect();
    assert_eq!(times, vec![0.0, 4.0 / 24.0, 9.0 / 24.0]);
    let modes: Vec<Interpolation> = poses.iter().map(|p| p.interpolation).collect();
    assert_eq!(
        modes,
        vec![Interpolation::Linear, Interpolation::Linear, Interpolation::Constant]
    );
}

#[test]
fn test_flipping_rotations_are_continuous() {
    let (temp, exporter) = setup();
    let mut scene = MemoryScene::new(SceneTiming::default());

    let mut ch = Channel::new("rotation_quaternion", 0);
    let mut obj = MemoryObject::new("Spinner", ObjectKind::Mesh);
    for i in 0..12i64 {
        ch = ch.with_key((i + 1) as f64, Interpolation::Linear);
        // Half turn steps past pi make raw decomposition change hemisphere
        let q = DQuat::from_rotation_y(0.7 * i as f64);
        obj.poses.insert(i + 1, DMat4::from_quat(q));
    }
    obj.animation = Some(AnimationData::new(Action::with_channels("spin", vec![ch])));
    scene.add_object(obj);
    scene.link("EXPORT", "Spinner");

    exporter.export_collection(&mut scene).unwrap();

    let poses = read_track(&temp.path().join("Animation/Spinner.animation")).unwrap();
    assert_eq!(poses.len(), 12);
    for w in poses.windows(2) {
        assert!(w[0].rotation.dot(w[1].rotation) >= 0.0);
    }
}

/// Host that can only evaluate at its current frame, like a DCC application.
struct CursorHost {
    inner: MemoryScene,
    moves: usize,
}

impl SceneHost for CursorHost {
    fn timing(&self) -> SceneTiming {
        self.inner.timing()
    }
    fn collection_objects(&self, collection: &str) -> Option<Vec<String>> {
        self.inner.collection_objects(collection)
    }
    fn enumerate_objects(&self) -> Vec<String> {
        self.inner.enumerate_objects()
    }
    fn object_kind(&self, name: &str) -> Result<ObjectKind> {
        self.inner.object_kind(name)
    }
    fn animation_data(&self, name: &str) -> Result<Option<AnimationData>> {
        self.inner.animation_data(name)
    }
    fn set_action_slot(&mut self, name: &str, slot: usize) -> Result<()> {
        self.inner.set_action_slot(name, slot)
    }
    fn select(&mut self, name: &str, selected: bool) -> Result<()> {
        self.inner.select(name, selected)
    }
    fn is_selected(&self, name: &str) -> Result<bool> {
        self.inner.is_selected(name)
    }
    fn world_matrix(&self, name: &str) -> Result<DMat4> {
        self.inner.world_matrix(name)
    }
    fn set_world_matrix(&mut self, name: &str, matrix: DMat4) -> Result<()> {
        self.inner.set_world_matrix(name, matrix)
    }
    fn current_frame(&self) -> Frame {
        self.inner.current_frame()
    }
    fn set_current_frame(&mut self, frame: Frame) -> Result<()> {
        self.inner.set_current_frame(frame)
    }
    fn evaluate_world_transform(&mut self, name: &str, frame: Frame) -> Result<DMat4> {
        self.moves += 1;
        self.set_current_frame(frame)?;
        let current = self.current_frame();
        self.inner.evaluate_world_transform(name, current)
    }
    fn export_selected_mesh(&mut self, path: &Path, options: &MeshExportOptions) -> Result<()> {
        self.inner.export_selected_mesh(path, options)
    }
}

#[test]
fn test_frame_cursor_restored() {
    let (_temp, exporter) = setup();
    let mut host = CursorHost {
        inner: scene(),
        moves: 0,
    };
    host.set_current_frame(7).unwrap();

    exporter.export_collection(&mut host).unwrap();

    assert_eq!(host.moves, 3);
    assert_eq!(host.current_frame(), 7);
}

#[test]
fn test_scene_json_end_to_end() {
    let temp = TempDir::new().unwrap();
    let blend_dir = temp.path().join("Blender");
    fs::create_dir_all(&blend_dir).unwrap();

    let scene_path = blend_dir.join("scene.json");
    fs::write(&scene_path, scene().to_json().unwrap()).unwrap();

    let mut loaded = MemoryScene::load(&scene_path).unwrap();
    let stats = Exporter::new(&ExportConfig::default(), &blend_dir)
        .export_collection(&mut loaded)
        .unwrap();
    assert_eq!(stats.files(), 4);

    let project = temp.path().join("sampleProject");
    assert!(project.join("ObjFiles/Cube.obj").exists());
    assert!(project.join("Animation/Cube.animation").exists());
}
