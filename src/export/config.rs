//! Export configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::anim::{ContinuityStage, TrackOptions};
use crate::util::{Error, Result};

/// Collection exported when none is configured.
pub const DEFAULT_COLLECTION: &str = "EXPORT";

/// Where and how to export. Relative paths resolve against a base directory,
/// normally the directory of the scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Project receiving the exported files.
    pub project_dir: PathBuf,
    pub mesh_subdir: PathBuf,
    pub animation_subdir: PathBuf,
    /// Collection whose objects are exported.
    pub collection: String,
    /// Rotate camera orientations by -90° about local X.
    pub camera_correction: bool,
    pub continuity_stage: ContinuityStage,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("../sampleProject"),
            mesh_subdir: PathBuf::from("ObjFiles"),
            animation_subdir: PathBuf::from("Animation"),
            collection: DEFAULT_COLLECTION.to_string(),
            camera_correction: true,
            continuity_stage: ContinuityStage::AfterCamera,
        }
    }
}

impl ExportConfig {
    /// User-level config path: `<config dir>/anim-export/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("anim-export");
            p.push("config.json");
            p
        })
    }

    /// Load a config file; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the user-level config, or defaults if there is none.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.collection.is_empty() {
            return Err(Error::InvalidConfig("collection name is empty".into()));
        }
        Ok(())
    }

    pub fn project_root(&self, base: &Path) -> PathBuf {
        base.join(&self.project_dir)
    }

    pub fn mesh_dir(&self, base: &Path) -> PathBuf {
        self.project_root(base).join(&self.mesh_subdir)
    }

    pub fn animation_dir(&self, base: &Path) -> PathBuf {
        self.project_root(base).join(&self.animation_subdir)
    }

    pub fn track_options(&self) -> TrackOptions {
        TrackOptions {
            camera_correction: self.camera_correction,
            continuity_stage: self.continuity_stage,
        }
    }
}
